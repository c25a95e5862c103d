use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::CoreError;

/// Page size used when the caller does not choose one.
pub const DEFAULT_LIMIT: u32 = 100;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Optional criteria narrowing a read, plus pagination.
///
/// `to` is stored already shifted to the following day so an upper bound
/// covers the whole selected day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditLogFilterContext {
    page_number: u32,
    limit: u32,
    entity: Option<String>,
    username: Option<String>,
    label: Option<String>,
    action: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl Default for AuditLogFilterContext {
    fn default() -> Self {
        Self {
            page_number: 1,
            limit: DEFAULT_LIMIT,
            entity: None,
            username: None,
            label: None,
            action: None,
            from: None,
            to: None,
        }
    }
}

impl AuditLogFilterContext {
    /// Unfiltered context for one page.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `page_number` is zero or `limit` is zero.
    pub fn new(page_number: u32, limit: u32) -> Result<Self, CoreError> {
        if page_number == 0 {
            return Err(CoreError::Validation("page number must be at least 1".into()));
        }
        if limit == 0 {
            return Err(CoreError::Validation("limit must be greater than 0".into()));
        }
        Ok(Self {
            page_number,
            limit,
            ..Self::default()
        })
    }

    /// Build a context from raw request values. Dates are `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` for an invalid page/limit or an unparseable date.
    #[allow(clippy::too_many_arguments)]
    pub fn parse(
        page_number: u32,
        limit: u32,
        entity: Option<String>,
        username: Option<String>,
        from: Option<&str>,
        to: Option<&str>,
        label: Option<String>,
        action: Option<String>,
    ) -> Result<Self, CoreError> {
        let mut ctx = Self::new(page_number, limit)?;
        ctx.entity = entity;
        ctx.username = username;
        ctx.label = label;
        ctx.action = action;
        if let Some(from) = from {
            ctx = ctx.with_from(parse_date(from)?);
        }
        if let Some(to) = to {
            ctx = ctx.with_to(parse_date(to)?);
        }
        Ok(ctx)
    }

    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    #[must_use]
    pub const fn with_from(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    /// Inclusive end day; stored as the start of the following day.
    #[must_use]
    pub fn with_to(mut self, to: NaiveDate) -> Self {
        self.to = Some(to.succ_opt().unwrap_or(to));
        self
    }

    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page_number
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip: `(page_number - 1) * limit`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page_number as u64 - 1) * self.limit as u64
    }

    #[must_use]
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    #[must_use]
    pub const fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    /// Exclusive upper bound (the day after the selected end day).
    #[must_use]
    pub const fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    #[must_use]
    pub const fn has_content_filter(&self) -> bool {
        self.entity.is_some()
            || self.username.is_some()
            || self.from.is_some()
            || self.to.is_some()
            || self.label.is_some()
            || self.action.is_some()
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| CoreError::InvalidDate {
        value: value.to_string(),
    })
}
