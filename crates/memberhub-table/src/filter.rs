//! Filter widgets and their translation into request predicates.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use memberhub_core::config::table::TableConfig;
use memberhub_core::error::AppError;
use memberhub_core::result::AppResult;
use memberhub_core::types::{Filter, FilterValue};

/// ISO-8601 UTC timestamp with millisecond precision.
const ISO_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Step used to walk out of a daylight-saving gap.
const GAP_STEP_MINUTES: i64 = 30;

/// Longest daylight-saving gap crossed before giving up.
const GAP_MAX_STEPS: u32 = 4;

/// Input widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Single choice.
    Select,
    /// Several choices.
    Multiselect,
    /// One calendar day.
    Date,
    /// Inclusive range of calendar days.
    Daterange,
    /// Free text.
    Text,
    /// Numeric input.
    Number,
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Date => "date",
            Self::Daterange => "daterange",
            Self::Text => "text",
            Self::Number => "number",
        };
        f.write_str(name)
    }
}

/// One choice of a select or multiselect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Shown to the operator.
    pub label: String,
    /// Sent to the server.
    pub value: String,
}

impl FilterOption {
    /// Create an option.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A value held by a filter widget before it is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum StagedValue {
    /// Nothing entered.
    Empty,
    /// Text, or the chosen value of a select.
    Text(String),
    /// Chosen values of a multiselect.
    Many(Vec<String>),
    /// A calendar day.
    Date(NaiveDate),
    /// A range of days; either end may still be missing.
    Range {
        /// First day.
        start: Option<NaiveDate>,
        /// Last day, inclusive.
        end: Option<NaiveDate>,
    },
    /// A number.
    Number(f64),
}

impl StagedValue {
    /// Whether the value produces no predicate.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Many(values) => values.is_empty(),
            Self::Range { start, end } => start.is_none() || end.is_none(),
            Self::Date(_) | Self::Number(_) => false,
        }
    }

    /// Parse a typed value for a widget of `filter_type`.
    ///
    /// Multiselects take comma-separated values, date ranges `start..end`,
    /// dates `YYYY-MM-DD`.
    pub fn parse(filter_type: FilterType, raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::Empty);
        }
        match filter_type {
            FilterType::Select | FilterType::Text => Ok(Self::Text(raw.to_string())),
            FilterType::Multiselect => Ok(Self::Many(
                raw.split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            FilterType::Date => parse_date(raw).map(Self::Date),
            FilterType::Daterange => {
                let (start, end) = raw.split_once("..").ok_or_else(|| {
                    AppError::validation(format!("Expected a range like 2024-01-01..2024-01-31, got '{raw}'"))
                })?;
                let start = start.trim();
                let end = end.trim();
                Ok(Self::Range {
                    start: if start.is_empty() { None } else { Some(parse_date(start)?) },
                    end: if end.is_empty() { None } else { Some(parse_date(end)?) },
                })
            }
            FilterType::Number => raw
                .parse::<f64>()
                .map(Self::Number)
                .map_err(|_| AppError::validation(format!("'{raw}' is not a number"))),
        }
    }
}

fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("'{raw}' is not a date (YYYY-MM-DD)")))
}

/// A filter widget declared by a list page.
#[derive(Debug, Clone)]
pub struct DataTableFilter {
    /// Field the predicate targets; also the staging key.
    pub key: String,
    /// Widget label.
    pub label: String,
    /// Widget kind.
    pub filter_type: FilterType,
    /// Choices for select widgets.
    pub options: Vec<FilterOption>,
    /// Value staged and applied when the table is created.
    pub default_value: Option<StagedValue>,
}

impl DataTableFilter {
    /// Declare a filter.
    pub fn new(key: impl Into<String>, label: impl Into<String>, filter_type: FilterType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            filter_type,
            options: Vec::new(),
            default_value: None,
        }
    }

    /// Add choices.
    pub fn with_options<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = FilterOption>,
    {
        self.options.extend(options);
        self
    }

    /// Yes/No choices mapping to `"true"`/`"false"`.
    pub fn yes_no(self) -> Self {
        self.with_options([FilterOption::new("Yes", "true"), FilterOption::new("No", "false")])
    }

    /// Set the initial value.
    pub fn with_default(mut self, value: StagedValue) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// A zone in which calendar days are resolved to instants.
///
/// Implemented for every [`chrono::TimeZone`], so [`Local`], [`Utc`] and
/// [`chrono::FixedOffset`] all qualify.
pub trait CalendarZone: fmt::Debug + Send + Sync {
    /// The instant of a local wall-clock time, or `None` inside a gap.
    /// Repeated wall-clock times resolve to the earlier instant when
    /// `earliest` is set and to the later one otherwise.
    fn resolve(&self, local: NaiveDateTime, earliest: bool) -> Option<DateTime<Utc>>;
}

impl<Tz> CalendarZone for Tz
where
    Tz: TimeZone + fmt::Debug + Send + Sync,
{
    fn resolve(&self, local: NaiveDateTime, earliest: bool) -> Option<DateTime<Utc>> {
        let found = self.from_local_datetime(&local);
        let zoned = if earliest { found.earliest() } else { found.latest() }?;
        Some(zoned.with_timezone(&Utc))
    }
}

/// Translates staged widget values into [`Filter`]s.
#[derive(Debug, Clone)]
pub struct FilterComposer {
    /// Zone in which calendar days start and end.
    zone: Arc<dyn CalendarZone>,
}

impl FilterComposer {
    /// Compose with day boundaries in `zone`. Each day is resolved with the
    /// offset in force on that day.
    pub fn new(zone: impl CalendarZone + 'static) -> Self {
        Self {
            zone: Arc::new(zone),
        }
    }

    /// Compose with day boundaries in UTC.
    pub fn utc() -> Self {
        Self::new(Utc)
    }

    /// Compose with day boundaries in the local zone.
    pub fn local() -> Self {
        Self::new(Local)
    }

    /// The configured fixed offset, or the local zone when none is set.
    pub fn from_config(config: &TableConfig) -> Self {
        match config.fixed_offset() {
            Some(offset) => Self::new(offset),
            None => Self::local(),
        }
    }

    /// The predicate for one widget, or `None` when the value is empty or
    /// does not fit the widget.
    pub fn compose(&self, filter: &DataTableFilter, value: &StagedValue) -> Option<Filter> {
        if value.is_empty() {
            return None;
        }
        let key = filter.key.clone();
        match (filter.filter_type, value) {
            (FilterType::Multiselect, StagedValue::Many(values)) => Some(Filter::one_of(
                key,
                values.iter().map(|v| FilterValue::coerce(v)),
            )),
            (FilterType::Multiselect, StagedValue::Text(v)) => {
                Some(Filter::one_of(key, [FilterValue::coerce(v)]))
            }
            (
                FilterType::Daterange,
                StagedValue::Range {
                    start: Some(start),
                    end: Some(end),
                },
            ) => {
                let (first, last) = if start <= end { (start, end) } else { (end, start) };
                Some(Filter::between(
                    key,
                    self.start_of_day(*first)?,
                    self.end_of_day(*last)?,
                ))
            }
            (FilterType::Date, StagedValue::Date(day)) => {
                Some(Filter::equals(key, self.start_of_day(*day)?))
            }
            (FilterType::Number, StagedValue::Number(n)) => Some(Filter::equals(key, number(*n))),
            (FilterType::Select | FilterType::Text, StagedValue::Text(v)) => {
                Some(Filter::equals(key, FilterValue::coerce(v.trim())))
            }
            (FilterType::Select | FilterType::Text, StagedValue::Number(n)) => {
                Some(Filter::equals(key, number(*n)))
            }
            _ => None,
        }
    }

    /// Predicates for every staged value, in declaration order.
    ///
    /// Staged keys without a declared filter are ignored.
    pub fn compose_all(
        &self,
        filters: &[DataTableFilter],
        staged: &HashMap<String, StagedValue>,
    ) -> Vec<Filter> {
        filters
            .iter()
            .filter_map(|filter| {
                staged
                    .get(&filter.key)
                    .and_then(|value| self.compose(filter, value))
            })
            .collect()
    }

    /// Midnight of `day` in the composer's zone, as UTC ISO-8601.
    ///
    /// A midnight skipped by daylight saving moves to the first wall-clock
    /// time that exists.
    pub fn start_of_day(&self, day: NaiveDate) -> Option<String> {
        self.boundary(day.and_hms_milli_opt(0, 0, 0, 0)?, true)
    }

    /// Last millisecond of `day` in the composer's zone, as UTC ISO-8601.
    pub fn end_of_day(&self, day: NaiveDate) -> Option<String> {
        self.boundary(day.and_hms_milli_opt(23, 59, 59, 999)?, false)
    }

    /// Resolve a day boundary, stepping inward across a gap. Start
    /// boundaries take the earlier of two repeated instants, end boundaries
    /// the later.
    fn boundary(&self, local: NaiveDateTime, start: bool) -> Option<String> {
        let step = if start {
            TimeDelta::minutes(GAP_STEP_MINUTES)
        } else {
            TimeDelta::minutes(-GAP_STEP_MINUTES)
        };
        let mut candidate = local;
        for _ in 0..=GAP_MAX_STEPS {
            if let Some(instant) = self.zone.resolve(candidate, start) {
                return Some(instant.format(ISO_MILLIS).to_string());
            }
            candidate = candidate.checked_add_signed(step)?;
        }
        None
    }
}

impl Default for FilterComposer {
    fn default() -> Self {
        Self::utc()
    }
}

fn number(n: f64) -> FilterValue {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        FilterValue::Integer(n as i64)
    } else {
        FilterValue::Float(n)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, LocalResult};
    use memberhub_core::types::FilterOperator;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        day.and_hms_opt(h, m, 0).unwrap()
    }

    /// New York in 2024: EDT from 2024-03-10 07:00 UTC until
    /// 2024-11-03 06:00 UTC, EST otherwise.
    #[derive(Debug, Clone, Copy)]
    struct NewYork2024;

    impl NewYork2024 {
        fn est() -> FixedOffset {
            FixedOffset::west_opt(5 * 3600).unwrap()
        }

        fn edt() -> FixedOffset {
            FixedOffset::west_opt(4 * 3600).unwrap()
        }
    }

    impl TimeZone for NewYork2024 {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            NewYork2024
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&at(*local, 12, 0))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let standard = self.offset_from_utc_datetime(&(*local + TimeDelta::hours(5)));
            let daylight = self.offset_from_utc_datetime(&(*local + TimeDelta::hours(4)));
            match (standard == Self::est(), daylight == Self::edt()) {
                (true, true) => LocalResult::Ambiguous(Self::edt(), Self::est()),
                (true, false) => LocalResult::Single(Self::est()),
                (false, true) => LocalResult::Single(Self::edt()),
                (false, false) => LocalResult::None,
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&at(*utc, 0, 0))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            let daylight_from = at(day(2024, 3, 10), 7, 0);
            let daylight_until = at(day(2024, 11, 3), 6, 0);
            if (daylight_from..daylight_until).contains(utc) {
                Self::edt()
            } else {
                Self::est()
            }
        }
    }

    #[test]
    fn test_multiselect_coerces_booleans() {
        let filter = DataTableFilter::new("isActive", "Active", FilterType::Multiselect).yes_no();
        let value = StagedValue::Many(vec!["true".into(), "false".into()]);
        let composed = FilterComposer::utc().compose(&filter, &value).unwrap();
        assert_eq!(composed.operator, FilterOperator::In);
        assert_eq!(
            composed.value,
            FilterValue::List(vec![FilterValue::Bool(true), FilterValue::Bool(false)])
        );
    }

    #[test]
    fn test_daterange_spans_whole_days() {
        let filter = DataTableFilter::new("createdAt", "Created", FilterType::Daterange);
        let value = StagedValue::Range {
            start: Some(day(2024, 1, 1)),
            end: Some(day(2024, 1, 31)),
        };
        let composed = FilterComposer::utc().compose(&filter, &value).unwrap();
        assert_eq!(composed.operator, FilterOperator::Between);
        assert_eq!(
            composed.value,
            FilterValue::list(["2024-01-01T00:00:00.000Z", "2024-01-31T23:59:59.999Z"])
        );
    }

    #[test]
    fn test_day_boundaries_follow_time_zone() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let composer = FilterComposer::new(ist);
        assert_eq!(
            composer.start_of_day(day(2024, 1, 1)).unwrap(),
            "2023-12-31T18:30:00.000Z"
        );
        assert_eq!(
            composer.end_of_day(day(2024, 1, 31)).unwrap(),
            "2024-01-31T18:29:59.999Z"
        );
    }

    #[test]
    fn test_each_day_uses_its_own_offset() {
        let composer = FilterComposer::new(NewYork2024);
        assert_eq!(
            composer.start_of_day(day(2024, 1, 1)).unwrap(),
            "2024-01-01T05:00:00.000Z"
        );
        assert_eq!(
            composer.end_of_day(day(2024, 1, 31)).unwrap(),
            "2024-02-01T04:59:59.999Z"
        );
        assert_eq!(
            composer.end_of_day(day(2024, 7, 15)).unwrap(),
            "2024-07-16T03:59:59.999Z"
        );

        let filter = DataTableFilter::new("createdAt", "Created", FilterType::Daterange);
        let across_spring_forward = StagedValue::Range {
            start: Some(day(2024, 3, 1)),
            end: Some(day(2024, 3, 31)),
        };
        let composed = composer.compose(&filter, &across_spring_forward).unwrap();
        assert_eq!(
            composed.value,
            FilterValue::list(["2024-03-01T05:00:00.000Z", "2024-04-01T03:59:59.999Z"])
        );
    }

    #[test]
    fn test_gap_and_overlap_still_resolve() {
        let composer = FilterComposer::new(NewYork2024);

        // 02:30 does not exist on 2024-03-10; 03:00 EDT is the next valid time.
        let skipped = at(day(2024, 3, 10), 2, 30);
        assert_eq!(
            composer.boundary(skipped, true).unwrap(),
            "2024-03-10T07:00:00.000Z"
        );
        assert_eq!(
            composer.boundary(skipped, false).unwrap(),
            "2024-03-10T06:30:00.000Z"
        );

        // 01:30 happens twice on 2024-11-03.
        let repeated = at(day(2024, 11, 3), 1, 30);
        assert_eq!(
            composer.boundary(repeated, true).unwrap(),
            "2024-11-03T05:30:00.000Z"
        );
        assert_eq!(
            composer.boundary(repeated, false).unwrap(),
            "2024-11-03T06:30:00.000Z"
        );
    }

    #[test]
    fn test_config_selects_zone() {
        let fixed = TableConfig {
            time_zone_offset_minutes: Some(330),
            ..TableConfig::default()
        };
        assert_eq!(
            FilterComposer::from_config(&fixed)
                .start_of_day(day(2024, 1, 1))
                .unwrap(),
            "2023-12-31T18:30:00.000Z"
        );

        let local_midnight = Local
            .from_local_datetime(&at(day(2024, 1, 15), 0, 0))
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
            .format(ISO_MILLIS)
            .to_string();
        assert_eq!(
            FilterComposer::from_config(&TableConfig::default())
                .start_of_day(day(2024, 1, 15))
                .unwrap(),
            local_midnight
        );
    }

    #[test]
    fn test_date_is_equals_midnight() {
        let filter = DataTableFilter::new("dateOfDeath", "Date of death", FilterType::Date);
        let composed = FilterComposer::utc()
            .compose(&filter, &StagedValue::Date(day(2024, 3, 2)))
            .unwrap();
        assert_eq!(composed.operator, FilterOperator::Equals);
        assert_eq!(composed.value, FilterValue::Text("2024-03-02T00:00:00.000Z".into()));
    }

    #[test]
    fn test_empty_values_dropped() {
        let composer = FilterComposer::utc();
        let range = DataTableFilter::new("createdAt", "Created", FilterType::Daterange);
        let half_open = StagedValue::Range {
            start: Some(day(2024, 1, 1)),
            end: None,
        };
        assert!(composer.compose(&range, &half_open).is_none());

        let status = DataTableFilter::new("status", "Status", FilterType::Select);
        assert!(composer.compose(&status, &StagedValue::Text(String::new())).is_none());
        let tags = DataTableFilter::new("tags", "Tags", FilterType::Multiselect);
        assert!(composer.compose(&tags, &StagedValue::Many(Vec::new())).is_none());
    }

    #[test]
    fn test_select_and_number() {
        let composer = FilterComposer::utc();
        let select = DataTableFilter::new("isActive", "Active", FilterType::Select).yes_no();
        let composed = composer.compose(&select, &StagedValue::Text("false".into())).unwrap();
        assert_eq!(composed.value, FilterValue::Bool(false));

        let count = DataTableFilter::new("memberCount", "Members", FilterType::Number);
        let composed = composer.compose(&count, &StagedValue::Number(12.0)).unwrap();
        assert_eq!(composed.value, FilterValue::Integer(12));
    }

    #[test]
    fn test_compose_all_keeps_declaration_order() {
        let filters = vec![
            DataTableFilter::new("status", "Status", FilterType::Select),
            DataTableFilter::new("unitId", "Unit", FilterType::Select),
        ];
        let staged = HashMap::from([
            ("unitId".to_string(), StagedValue::Text("u-1".into())),
            ("status".to_string(), StagedValue::Text("active".into())),
            ("unknown".to_string(), StagedValue::Text("x".into())),
        ]);
        let composed = FilterComposer::utc().compose_all(&filters, &staged);
        let fields: Vec<&str> = composed.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, ["status", "unitId"]);
    }

    #[test]
    fn test_parse_staged_values() {
        assert_eq!(
            StagedValue::parse(FilterType::Multiselect, "active, suspended").unwrap(),
            StagedValue::Many(vec!["active".into(), "suspended".into()])
        );
        assert_eq!(
            StagedValue::parse(FilterType::Daterange, "2024-01-01..").unwrap(),
            StagedValue::Range {
                start: Some(day(2024, 1, 1)),
                end: None
            }
        );
        assert!(StagedValue::parse(FilterType::Date, "01/02/2024").is_err());
        assert_eq!(StagedValue::parse(FilterType::Text, "  ").unwrap(), StagedValue::Empty);
    }
}
