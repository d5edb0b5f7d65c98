use fltr_gateway::{Column, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Info,
    Success,
    Warning,
    Error,
}

/// A non-blocking notification for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        variant: ToastVariant,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            variant,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message, ToastVariant::Error)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new("Info", message, ToastVariant::Info)
    }
}

/// Payload of the notification sent after a successful query
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedFilters {
    pub columns: Vec<Column>,
    pub primary_field: String,
    /// The currently visible page
    pub records: Vec<Record>,
    /// Selection tracked by the host, passed through untouched
    pub selection: Vec<String>,
}

/// Something the host should react to
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    Toast(Toast),
    FiltersApplied(AppliedFilters),
}
