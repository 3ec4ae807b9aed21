/// Read-only view over a rendered page.
pub trait DocumentSnapshot {
    /// Text content of every element matching `selector`, in document order.
    fn select_text(&self, selector: &str) -> Vec<String>;

    /// Whole-document text as a reader would see it.
    fn visible_text(&self) -> String;
}
