#![forbid(unsafe_code)]

//! Column layout reconciler for data-grid headers.
//!
//! This crate keeps a header's columns laid out edge to edge, lets users
//! drag a column to a new position while its siblings slide aside, and keeps
//! per-column sort indicators consistent with a shared sort order.
//!
//! # Key Components
//!
//! - [`ColumnView`] - Façade owning the sequence, sort state and drag session
//! - [`Column`] - One header cell with observable width, visibility, offset,
//!   z-order and sort fields
//! - [`ColumnSequence`] - Ordered columns that re-arrange on every change
//! - [`Animator`] - Injected runner for sibling slide transitions
//! - [`SortChannel`] - Shared pub/sub handle for the canonical sort order
//! - [`ViewConfig`] - Tunables loadable from TOML or JSON
//!
//! # Example
//!
//! ```
//! use colview::{ColumnSpec, ColumnView, SortDescriptor};
//!
//! let mut view = ColumnView::default();
//! let name = view.add_column(ColumnSpec::new("Name", 100.0));
//! let size = view.add_column(ColumnSpec::new("Size", 150.0));
//! view.add_column(ColumnSpec::new("Kind", 80.0));
//!
//! // Drag "Name" right by 150px while holding it 50px from its left edge.
//! view.start_drag(name, 50.0).unwrap();
//! view.drag(150.0).unwrap();
//! view.complete_drag().unwrap();
//! assert_eq!(view.index_of(name), Some(1));
//!
//! let sort = view.on_column_sort_requested(size, false).unwrap();
//! assert_eq!(sort, vec![SortDescriptor::ascending("Size")]);
//! ```
//!
//! # Threading
//!
//! Everything is single-threaded (`Rc`/`RefCell`). Change notifications run
//! synchronously inside the setter that caused them.

pub mod animation;
pub mod channel;
pub mod column;
pub mod config;
pub mod drag;
pub mod error;
pub mod event;
pub mod layout;
pub mod logging;
pub mod observable;
pub mod sort;
pub mod state;
pub mod view;

pub use animation::{Animator, Easing, ImmediateAnimator, Transition, Tween, TweenAnimator};
pub use channel::SortChannel;
pub use column::{Column, ColumnChange, ColumnId, ColumnSpec, ColumnSubscription};
pub use config::{Orientation, ViewConfig};
pub use drag::{DragSession, final_index};
pub use error::{ColumnViewError, ConfigError, Result};
pub use event::ColumnEvent;
pub use layout::{ColumnSequence, arrange_header, find_index, total_width};
pub use logging::{LogFormat, LoggingConfig};
pub use observable::{Observable, Subscription};
pub use sort::{SortDescriptor, SortDirection, SortState};
pub use state::{ColumnSnapshot, ColumnState, HeaderSnapshot, ViewState};
pub use view::ColumnView;
