#![forbid(unsafe_code)]

//! Ready-made headers for integration tests.

use std::rc::Rc;

use colview::{Column, ColumnId, ColumnSpec, ColumnView, SortChannel, ViewConfig};

use crate::animator::RecordingAnimator;

/// A view wired to a [`RecordingAnimator`] and a fresh [`SortChannel`].
///
/// Lookup helpers panic on unknown headers; this is test tooling.
#[derive(Debug)]
pub struct HeaderFixture {
    pub view: ColumnView,
    pub ids: Vec<ColumnId>,
    pub animator: RecordingAnimator,
    pub channel: SortChannel,
}

impl HeaderFixture {
    /// Default config; transitions stay pending until the drag completes.
    #[must_use]
    pub fn new(columns: &[(&str, f64)]) -> Self {
        Self::build(ViewConfig::default(), RecordingAnimator::new(), columns)
    }

    /// Default config; transitions apply immediately.
    #[must_use]
    pub fn immediate(columns: &[(&str, f64)]) -> Self {
        Self::build(ViewConfig::default(), RecordingAnimator::applying(), columns)
    }

    #[must_use]
    pub fn with_config(config: ViewConfig, columns: &[(&str, f64)]) -> Self {
        Self::build(config, RecordingAnimator::new(), columns)
    }

    fn build(config: ViewConfig, animator: RecordingAnimator, columns: &[(&str, f64)]) -> Self {
        let channel = SortChannel::new();
        let mut view = ColumnView::new(config, animator.boxed(), Some(channel.clone()));
        let ids = columns
            .iter()
            .map(|(header, width)| view.add_column(ColumnSpec::new(*header, *width)))
            .collect();
        Self {
            view,
            ids,
            animator,
            channel,
        }
    }

    #[must_use]
    pub fn id(&self, header: &str) -> ColumnId {
        self.column(header).id()
    }

    #[must_use]
    pub fn column(&self, header: &str) -> Rc<Column> {
        self.view
            .columns()
            .into_iter()
            .find(|c| c.header() == header)
            .unwrap_or_else(|| panic!("fixture has no column {header:?}"))
    }

    /// Headers in display order.
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        self.view
            .columns()
            .iter()
            .map(|c| c.header().to_owned())
            .collect()
    }

    /// `left` of every column in display order.
    #[must_use]
    pub fn lefts(&self) -> Vec<f64> {
        self.view.columns().iter().map(|c| c.left()).collect()
    }
}
