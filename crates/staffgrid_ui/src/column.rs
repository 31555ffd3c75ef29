use std::{fmt, sync::Arc};

use staffgrid_db::TableData;

pub type ValueFn<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;
pub type CellFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// How a column reads its value off a row.
pub enum Accessor<T> {
    /// Dotted field path resolved through [`TableData::field`].
    Path(String),
    /// Computed value.
    Fn(ValueFn<T>),
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Path(path) => Self::Path(path.clone()),
            Self::Fn(f) => Self::Fn(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

impl<T: TableData> Accessor<T> {
    #[must_use]
    pub fn resolve(&self, row: &T) -> Option<String> {
        match self {
            Self::Path(path) => row.field(path),
            Self::Fn(f) => f(row),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Path(path) => Some(path),
            Self::Fn(_) => None,
        }
    }
}

/// Describes one displayed column of a table.
pub struct ColumnDef<T> {
    pub id: String,
    pub accessor: Option<Accessor<T>>,
    pub header: String,
    pub cell: Option<CellFn<T>>,
    pub width: Option<u16>,
    pub sortable: bool,
    pub hideable: bool,
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            accessor: self.accessor.clone(),
            header: self.header.clone(),
            cell: self.cell.clone(),
            width: self.width,
            sortable: self.sortable,
            hideable: self.hideable,
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("accessor", &self.accessor)
            .field("header", &self.header)
            .field("width", &self.width)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .finish_non_exhaustive()
    }
}

impl<T: TableData> ColumnDef<T> {
    /// A column whose id doubles as the field path it reads.
    pub fn field(path: impl Into<String>, header: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: path.clone(),
            accessor: Some(Accessor::Path(path)),
            header: header.into(),
            cell: None,
            width: None,
            sortable: true,
            hideable: true,
        }
    }

    /// A column with a computed value.
    pub fn computed(
        id: impl Into<String>,
        header: impl Into<String>,
        value: impl Fn(&T) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            accessor: Some(Accessor::Fn(Arc::new(value))),
            header: header.into(),
            cell: None,
            width: None,
            sortable: true,
            hideable: true,
        }
    }

    /// A render-only column with no accessor; it cannot be sorted.
    pub fn display(
        id: impl Into<String>,
        header: impl Into<String>,
        cell: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            accessor: None,
            header: header.into(),
            cell: Some(Arc::new(cell)),
            width: None,
            sortable: false,
            hideable: true,
        }
    }

    #[must_use]
    pub const fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn cell(
        mut self,
        cell: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        self.cell = Some(Arc::new(cell));
        self
    }

    #[must_use]
    pub const fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    #[must_use]
    pub const fn not_hideable(mut self) -> Self {
        self.hideable = false;
        self
    }

    /// Accessor value; `None` for display-only columns and missing fields.
    #[must_use]
    pub fn value(&self, row: &T) -> Option<String> {
        self.accessor.as_ref().and_then(|a| a.resolve(row))
    }

    /// Text shown in the cell.
    #[must_use]
    pub fn render_cell(&self, row: &T) -> String {
        self.cell.as_ref().map_or_else(
            || self.value(row).unwrap_or_default(),
            |cell| cell(row),
        )
    }

    #[must_use]
    pub const fn can_sort(&self) -> bool {
        self.sortable && self.accessor.is_some()
    }

    /// Whether `key` names this column, by id or by accessor path.
    #[must_use]
    pub fn answers_to(&self, key: &str) -> bool {
        self.id == key
            || self
                .accessor
                .as_ref()
                .and_then(Accessor::path)
                .is_some_and(|path| path == key)
    }
}
