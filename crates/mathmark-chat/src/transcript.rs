//! The chat box: rendered entries in arrival order, plus the waiting state.

/// Stable reference to one transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle(u64);

/// Rendered entries, oldest first.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<(EntryHandle, String)>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, html: String) -> EntryHandle {
        let handle = EntryHandle(self.next_id);
        self.next_id += 1;
        self.entries.push((handle, html));
        handle
    }

    /// Removes an entry. Returns false if it was already gone.
    pub fn remove(&mut self, handle: EntryHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _)| *h != handle);
        self.entries.len() != before
    }

    pub fn contains(&self, handle: EntryHandle) -> bool {
        self.entries.iter().any(|(h, _)| *h == handle)
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, html)| html.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_html(&self) -> String {
        self.entries().collect::<Vec<_>>().join("\n")
    }
}

/// Whether a typing indicator is on screen, and which entry it is.
///
/// This is a plain value: operations take it and hand back the next state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitingState {
    pub pending: bool,
    pub element: Option<EntryHandle>,
}

impl WaitingState {
    /// Appends `indicator` and returns the state pointing at it. An
    /// indicator left over from an earlier exchange is removed first.
    pub fn show(self, transcript: &mut Transcript, indicator: String) -> WaitingState {
        if let Some(stale) = self.element {
            log::warn!("Typing indicator already present, replacing it");
            transcript.remove(stale);
        }
        WaitingState {
            pending: true,
            element: Some(transcript.append(indicator)),
        }
    }

    /// Removes the indicator, if any.
    pub fn clear(self, transcript: &mut Transcript) -> WaitingState {
        if let Some(element) = self.element {
            log::debug!("Removing typing indicator");
            transcript.remove(element);
        }
        WaitingState::default()
    }
}
