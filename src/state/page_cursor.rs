/// Position of the pagination walk
///
/// `highest_known_page_number` never decreases. A fresh cursor sits on page 1
/// and has not observed any page label yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    current_page_number: u32,
    highest_known_page_number: u32,
}

impl PageCursor {
    pub fn new() -> Self {
        Self {
            current_page_number: 1,
            highest_known_page_number: 0,
        }
    }

    pub fn current_page_number(&self) -> u32 {
        self.current_page_number
    }

    pub fn highest_known_page_number(&self) -> u32 {
        self.highest_known_page_number
    }

    /// Moves the cursor onto `page` if it is beyond everything seen so far
    ///
    /// Returns false, leaving the cursor untouched, for any page at or below
    /// the current high-water mark.
    pub fn advance_to(&mut self, page: u32) -> bool {
        if page <= self.highest_known_page_number {
            return false;
        }
        self.highest_known_page_number = page;
        self.current_page_number = page;
        true
    }

    /// Whether the walk has reached `cap` (0 means no cap)
    pub fn reached_cap(&self, cap: u32) -> bool {
        cap != 0 && self.highest_known_page_number >= cap
    }

    /// The resolved page count: at least 1, clamped to `cap` when set
    pub fn page_count(&self, cap: u32) -> u32 {
        let count = self.highest_known_page_number.max(1);
        if cap == 0 {
            count
        } else {
            count.min(cap)
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}
