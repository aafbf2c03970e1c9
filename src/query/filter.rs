use std::fmt;

use chrono::NaiveDate;

use crate::{
    domain::{parse_iso_date, Category, ExpenseRecord},
    errors::ValidationError,
};

/// Category selector of a [`FilterSpec`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parses a selector value: `all` (or empty) or an exact category name.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value
            .parse::<Category>()
            .map(Self::Only)
            .map_err(|_| ValidationError::UnknownCategory)
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => *selected == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

/// Which records a view shows. Date bounds are inclusive and optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub category: CategoryFilter,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl FilterSpec {
    pub fn new(
        category: CategoryFilter,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            category,
            from_date,
            to_date,
        }
        .normalized()
    }

    /// Builds a filter from raw selector values; empty dates mean "no bound".
    pub fn from_inputs(category: &str, from: &str, to: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(
            CategoryFilter::parse(category)?,
            parse_bound(from)?,
            parse_bound(to)?,
        ))
    }

    pub fn category(category: Category) -> Self {
        Self {
            category: CategoryFilter::Only(category),
            ..Self::default()
        }
    }

    /// Swaps the bounds when both are set and entered out of order.
    pub fn normalized(mut self) -> Self {
        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if from > to {
                self.from_date = Some(to);
                self.to_date = Some(from);
            }
        }
        self
    }

    /// Resets every criterion to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_cleared(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &ExpenseRecord) -> bool {
        self.category.matches(record.category)
            && self.from_date.map_or(true, |from| record.date >= from)
            && self.to_date.map_or(true, |to| record.date <= to)
    }
}

fn parse_bound(value: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    parse_iso_date(value)
        .map(Some)
        .ok_or(ValidationError::InvalidDate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn out_of_order_bounds_are_swapped() {
        let filter = FilterSpec::new(CategoryFilter::All, Some(date(20)), Some(date(3)));
        assert_eq!(filter.from_date, Some(date(3)));
        assert_eq!(filter.to_date, Some(date(20)));
    }

    #[test]
    fn from_inputs_treats_empty_values_as_unset() {
        let filter = FilterSpec::from_inputs("all", "", "").expect("valid filter");
        assert!(filter.is_cleared());

        let filter = FilterSpec::from_inputs("Bills", "2024-05-09", "").expect("valid filter");
        assert_eq!(filter.category, CategoryFilter::Only(Category::Bills));
        assert_eq!(filter.from_date, Some(date(9)));
        assert_eq!(filter.to_date, None);
    }

    #[test]
    fn from_inputs_rejects_bad_values() {
        assert_eq!(
            FilterSpec::from_inputs("Groceries", "", ""),
            Err(ValidationError::UnknownCategory)
        );
        assert_eq!(
            FilterSpec::from_inputs("all", "05/09/2024", ""),
            Err(ValidationError::InvalidDate)
        );
    }

    #[test]
    fn clear_restores_defaults() {
        let mut filter = FilterSpec::new(
            CategoryFilter::Only(Category::Food),
            Some(date(1)),
            Some(date(2)),
        );
        filter.clear();
        assert!(filter.is_cleared());
    }
}
