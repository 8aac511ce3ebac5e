use crate::types::ParsedSection;
use std::collections::VecDeque;

/// Accumulator for emitted sections with an explicit pressure capacity.
///
/// Sections accumulate without limit until the orchestrator reports memory
/// pressure; then everything but the newest `capacity` sections is dropped.
/// Assembly shallow-merges by kind, so the newest sections are the ones that
/// matter.
#[derive(Debug)]
pub struct SectionRing {
    capacity: usize,
    sections: VecDeque<ParsedSection>,
    retained_bytes: usize,
    evicted: usize,
}

impl SectionRing {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            sections: VecDeque::new(),
            retained_bytes: 0,
            evicted: 0,
        }
    }

    pub fn push(&mut self, section: ParsedSection) {
        self.retained_bytes += section.byte_size;
        self.sections.push_back(section);
    }

    /// Drop the oldest sections beyond capacity; returns how many went
    pub fn trim_to_capacity(&mut self) -> usize {
        let mut dropped = 0;
        while self.sections.len() > self.capacity {
            if let Some(old) = self.sections.pop_front() {
                self.retained_bytes -= old.byte_size;
                dropped += 1;
            }
        }
        self.evicted += dropped;
        dropped
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Source bytes represented by the retained sections
    pub fn retained_bytes(&self) -> usize {
        self.retained_bytes
    }

    /// Total sections dropped over the ring's lifetime
    pub fn evicted(&self) -> usize {
        self.evicted
    }

    /// Retained sections in arrival order
    pub fn into_sections(self) -> Vec<ParsedSection> {
        self.sections.into()
    }
}
