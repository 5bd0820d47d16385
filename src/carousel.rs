use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Tracks whether background scrolling of a rendered page is suspended.
///
/// Full-screen gallery mode takes a [`ScrollLock`]; the page stays frozen
/// until every lock has been dropped.
#[derive(Debug, Clone, Default)]
pub struct PageScroll {
    locks: Arc<AtomicUsize>,
}

impl PageScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> ScrollLock {
        self.locks.fetch_add(1, Ordering::SeqCst);
        ScrollLock {
            locks: self.locks.clone(),
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.locks.load(Ordering::SeqCst) > 0
    }
}

/// Released on drop, whichever way the owner goes away.
#[derive(Debug)]
pub struct ScrollLock {
    locks: Arc<AtomicUsize>,
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.locks.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselState {
    Closed,
    Open(usize),
}

#[derive(Debug)]
enum State {
    Closed,
    Open {
        index: usize,
        _lock: Option<ScrollLock>,
    },
}

/// Cyclic image browser used by listing cards and the detail page lightbox.
#[derive(Debug)]
pub struct Carousel {
    image_count: usize,
    scroll: Option<PageScroll>,
    state: State,
}

impl Carousel {
    /// Inline carousel that never touches page scrolling.
    pub fn new(image_count: usize) -> Self {
        Self {
            image_count,
            scroll: None,
            state: State::Closed,
        }
    }

    /// Full-screen carousel: while open, `scroll` is suspended.
    pub fn lightbox(image_count: usize, scroll: &PageScroll) -> Self {
        Self {
            image_count,
            scroll: Some(scroll.clone()),
            state: State::Closed,
        }
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    pub fn state(&self) -> CarouselState {
        match self.state {
            State::Closed => CarouselState::Closed,
            State::Open { index, .. } => CarouselState::Open(index),
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self.state {
            State::Closed => None,
            State::Open { index, .. } => Some(index),
        }
    }

    /// Opens on `index`, clamped to the last image.
    pub fn open(&mut self, index: usize) {
        let index = if self.image_count == 0 {
            0
        } else {
            index.min(self.image_count - 1)
        };
        let lock = self.scroll.as_ref().map(PageScroll::lock);
        self.state = State::Open { index, _lock: lock };
    }

    pub fn close(&mut self) {
        self.state = State::Closed;
    }

    pub fn next(&mut self) {
        let count = self.image_count;
        if let State::Open { index, .. } = &mut self.state {
            if count > 0 {
                *index = (*index + 1) % count;
            }
        }
    }

    pub fn previous(&mut self) {
        let count = self.image_count;
        if let State::Open { index, .. } = &mut self.state {
            if count > 0 {
                *index = (*index + count - 1) % count;
            }
        }
    }

    /// Index `next()` would land on, without moving.
    pub fn next_index(&self) -> Option<usize> {
        self.index().map(|i| {
            if self.image_count == 0 {
                0
            } else {
                (i + 1) % self.image_count
            }
        })
    }

    pub fn previous_index(&self) -> Option<usize> {
        self.index().map(|i| {
            if self.image_count == 0 {
                0
            } else {
                (i + self.image_count - 1) % self.image_count
            }
        })
    }
}
