/// Offset bookkeeping for one paginated feed
///
/// The offset only moves forward, and only after a page actually arrived.
/// Once a short page is seen the cursor stays exhausted until [`Cursor::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    offset: u32,
    page_size: u32,
    exhausted: bool,
}

impl Cursor {
    pub fn new(page_size: u32) -> Self {
        Self {
            offset: 0,
            page_size: page_size.max(1),
            exhausted: false,
        }
    }

    /// Offset of the next page to request
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn pages_loaded(&self) -> u32 {
        self.offset / self.page_size
    }

    /// Record a page that came back with `returned` items
    ///
    /// Always moves by a full page, even if the server sent back more or
    /// fewer items than asked for.
    pub fn advance(&mut self, returned: usize) {
        self.offset = self.offset.saturating_add(self.page_size);
        if returned < self.page_size as usize {
            self.exhausted = true;
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0;
        self.exhausted = false;
    }
}
