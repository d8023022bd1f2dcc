#![forbid(unsafe_code)]

//! Column model: one displayable field of the header.
//!
//! A [`Column`] keeps every mutable attribute in an [`Observable`], so the
//! header, the layout pass and external listeners all see the same value and
//! get old/new notifications on change. Only width and visibility are
//! writable from outside the crate; offsets, z-order and sort state belong to
//! the reconciler.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::observable::{Observable, Subscription};
use crate::sort::SortDirection;

/// Opaque identifier of a column within one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnId(u64);

impl ColumnId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declarative description of a column to add to a view.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub header: String,
    /// Key used to order data. Defaults to the header text.
    pub sort_member_path: Option<String>,
    pub width: f64,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub visible: bool,
}

impl ColumnSpec {
    #[must_use]
    pub fn new(header: impl Into<String>, width: f64) -> Self {
        Self {
            header: header.into(),
            sort_member_path: None,
            width,
            min_width: None,
            max_width: None,
            visible: true,
        }
    }

    #[must_use]
    pub fn sort_member_path(mut self, path: impl Into<String>) -> Self {
        self.sort_member_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn min_width(mut self, min: f64) -> Self {
        self.min_width = Some(min);
        self
    }

    #[must_use]
    pub fn max_width(mut self, max: f64) -> Self {
        self.max_width = Some(max);
        self
    }

    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// A property change reported by [`Column::observe`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnChange {
    Width { old: f64, new: f64 },
    Visible { old: bool, new: bool },
    Left { old: f64, new: f64 },
    ZIndex { old: i32, new: i32 },
    SortDirection {
        old: Option<SortDirection>,
        new: Option<SortDirection>,
    },
    SortOrder { old: Option<usize>, new: Option<usize> },
}

impl ColumnChange {
    /// Name of the changed property, for logs.
    #[must_use]
    pub const fn property(&self) -> &'static str {
        match self {
            Self::Width { .. } => "width",
            Self::Visible { .. } => "visible",
            Self::Left { .. } => "left",
            Self::ZIndex { .. } => "z_index",
            Self::SortDirection { .. } => "sort_direction",
            Self::SortOrder { .. } => "sort_order",
        }
    }
}

/// Guard returned by [`Column::observe`]; dropping it stops notifications.
#[derive(Debug)]
pub struct ColumnSubscription {
    _subs: Vec<Subscription>,
}

/// One displayable field of the header.
pub struct Column {
    id: ColumnId,
    header: String,
    sort_member_path: String,
    min_width: f64,
    max_width: f64,
    visible: Observable<bool>,
    width: Observable<f64>,
    left: Observable<f64>,
    /// Target of the last reorder transition; equals `left` at rest.
    desired_left: Cell<f64>,
    z_index: Observable<i32>,
    sort_direction: Observable<Option<SortDirection>>,
    sort_order: Observable<Option<usize>>,
}

impl Column {
    pub(crate) fn new(
        id: ColumnId,
        spec: ColumnSpec,
        default_min: f64,
        default_max: Option<f64>,
        base_z_index: i32,
    ) -> Self {
        let min_width = spec.min_width.unwrap_or(default_min).max(0.0);
        let max_width = spec
            .max_width
            .or(default_max)
            .unwrap_or(f64::INFINITY)
            .max(min_width);
        let width = clamp_width(spec.width, min_width, max_width);
        let sort_member_path = spec
            .sort_member_path
            .unwrap_or_else(|| spec.header.clone());
        Self {
            id,
            header: spec.header,
            sort_member_path,
            min_width,
            max_width,
            visible: Observable::new(spec.visible),
            width: Observable::new(width),
            left: Observable::new(0.0),
            desired_left: Cell::new(0.0),
            z_index: Observable::new(base_z_index),
            sort_direction: Observable::new(None),
            sort_order: Observable::new(None),
        }
    }

    #[must_use]
    pub fn id(&self) -> ColumnId {
        self.id
    }

    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    #[must_use]
    pub fn sort_member_path(&self) -> &str {
        &self.sort_member_path
    }

    #[must_use]
    pub fn min_width(&self) -> f64 {
        self.min_width
    }

    #[must_use]
    pub fn max_width(&self) -> f64 {
        self.max_width
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width.get()
    }

    /// Current render offset along the header axis.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.left.get()
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left() + self.width()
    }

    #[must_use]
    pub fn desired_left(&self) -> f64 {
        self.desired_left.get()
    }

    #[must_use]
    pub fn z_index(&self) -> i32 {
        self.z_index.get()
    }

    #[must_use]
    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort_direction.get()
    }

    /// Rank among the active sort columns, most significant first.
    #[must_use]
    pub fn sort_order(&self) -> Option<usize> {
        self.sort_order.get()
    }

    /// Resize the column, clamped to `[min_width, max_width]`.
    ///
    /// Returns `true` when the stored width changed.
    pub fn set_width(&self, width: f64) -> bool {
        self.width
            .set(clamp_width(width, self.min_width, self.max_width))
    }

    pub fn set_visible(&self, visible: bool) -> bool {
        self.visible.set(visible)
    }

    /// Handle to the `left` property, used as an animation target.
    #[must_use]
    pub fn left_property(&self) -> Observable<f64> {
        self.left.clone()
    }

    pub(crate) fn set_left(&self, left: f64) -> bool {
        self.left.set(left)
    }

    pub(crate) fn set_desired_left(&self, left: f64) {
        self.desired_left.set(left);
    }

    pub(crate) fn set_z_index(&self, z: i32) -> bool {
        self.z_index.set(z)
    }

    pub(crate) fn set_sort_direction(&self, direction: Option<SortDirection>) -> bool {
        self.sort_direction.set(direction)
    }

    pub(crate) fn set_sort_order(&self, order: Option<usize>) -> bool {
        self.sort_order.set(order)
    }

    pub(crate) fn subscribe_width(&self, f: impl Fn(&f64, &f64) + 'static) -> Subscription {
        self.width.subscribe(f)
    }

    pub(crate) fn subscribe_visible(&self, f: impl Fn(&bool, &bool) + 'static) -> Subscription {
        self.visible.subscribe(f)
    }

    /// Register a listener for every property of this column.
    ///
    /// The callback receives old/new pairs synchronously from inside the
    /// setter that caused the change.
    pub fn observe(&self, callback: impl Fn(&ColumnChange) + 'static) -> ColumnSubscription {
        let cb: Rc<dyn Fn(&ColumnChange)> = Rc::new(callback);
        let mut subs = Vec::with_capacity(6);

        let f = Rc::clone(&cb);
        subs.push(self.width.subscribe(move |old, new| {
            f(&ColumnChange::Width {
                old: *old,
                new: *new,
            });
        }));
        let f = Rc::clone(&cb);
        subs.push(self.visible.subscribe(move |old, new| {
            f(&ColumnChange::Visible {
                old: *old,
                new: *new,
            });
        }));
        let f = Rc::clone(&cb);
        subs.push(self.left.subscribe(move |old, new| {
            f(&ColumnChange::Left {
                old: *old,
                new: *new,
            });
        }));
        let f = Rc::clone(&cb);
        subs.push(self.z_index.subscribe(move |old, new| {
            f(&ColumnChange::ZIndex {
                old: *old,
                new: *new,
            });
        }));
        let f = Rc::clone(&cb);
        subs.push(self.sort_direction.subscribe(move |old, new| {
            f(&ColumnChange::SortDirection {
                old: *old,
                new: *new,
            });
        }));
        let f = cb;
        subs.push(self.sort_order.subscribe(move |old, new| {
            f(&ColumnChange::SortOrder {
                old: *old,
                new: *new,
            });
        }));

        ColumnSubscription { _subs: subs }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("sort_member_path", &self.sort_member_path)
            .field("visible", &self.is_visible())
            .field("width", &self.width())
            .field("left", &self.left())
            .field("desired_left", &self.desired_left())
            .field("z_index", &self.z_index())
            .field("sort_direction", &self.sort_direction())
            .field("sort_order", &self.sort_order())
            .finish()
    }
}

fn clamp_width(width: f64, min: f64, max: f64) -> f64 {
    if width.is_nan() {
        return min;
    }
    width.clamp(min, max)
}
