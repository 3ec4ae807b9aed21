/// Fragments shorter than this are UI chrome, not speech.
const MIN_FRAGMENT_CHARS: usize = 10;
/// Fragments longer than this are whole-panel dumps.
const MAX_FRAGMENT_CHARS: usize = 500;

/// Accumulates live caption fragments as a meeting page renders them.
#[derive(Debug, Default)]
pub struct CaptionBuffer {
    fragments: Vec<String>,
}

impl CaptionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the fragment was kept.
    pub fn push(&mut self, fragment: &str) -> bool {
        let length = fragment.chars().count();
        if length <= MIN_FRAGMENT_CHARS || length >= MAX_FRAGMENT_CHARS {
            return false;
        }
        self.fragments.push(fragment.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn transcript(&self) -> String {
        self.fragments.join("\n")
    }
}
