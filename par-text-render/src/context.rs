//! Resources shared by every font session.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use par_text_fonts::FontLibrary;

struct Shared<B> {
    library: FontLibrary,
    backend: RefCell<B>,
    sessions: Cell<usize>,
}

/// Registry of the rasterizer library and the GPU backend.
///
/// Cloning is cheap: every clone refers to the same resources, which are
/// released when the last clone (including the one held by each
/// [`crate::FontSession`]) is dropped.
pub struct TextContext<B> {
    shared: Rc<Shared<B>>,
}

impl<B> Clone for TextContext<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<B> std::fmt::Debug for TextContext<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextContext")
            .field("sessions", &self.shared.sessions.get())
            .field("library", &self.shared.library)
            .finish_non_exhaustive()
    }
}

impl<B> TextContext<B> {
    pub fn new(backend: B) -> Self {
        Self::with_library(backend, FontLibrary::new())
    }

    /// Share an existing rasterizer library with this context.
    pub fn with_library(backend: B, library: FontLibrary) -> Self {
        Self {
            shared: Rc::new(Shared {
                library,
                backend: RefCell::new(backend),
                sessions: Cell::new(0),
            }),
        }
    }

    pub fn library(&self) -> &FontLibrary {
        &self.shared.library
    }

    /// Borrow the backend.
    ///
    /// # Panics
    /// If the backend is mutably borrowed, e.g. while a session renders.
    pub fn backend(&self) -> Ref<'_, B> {
        self.shared.backend.borrow()
    }

    /// Mutably borrow the backend, e.g. to begin or finish a frame.
    ///
    /// # Panics
    /// If the backend is already borrowed.
    pub fn backend_mut(&self) -> RefMut<'_, B> {
        self.shared.backend.borrow_mut()
    }

    /// Number of live font sessions created from this context.
    pub fn session_count(&self) -> usize {
        self.shared.sessions.get()
    }

    /// True if both handles refer to the same resources.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    pub(crate) fn register_session(&self) {
        let count = self.shared.sessions.get() + 1;
        self.shared.sessions.set(count);
        log::debug!("Font session opened ({} live)", count);
    }

    pub(crate) fn release_session(&self) {
        let count = self.shared.sessions.get().saturating_sub(1);
        self.shared.sessions.set(count);
        log::debug!("Font session closed ({} live)", count);
    }
}
