//! Logical table names understood by the data-access layer.
//!
//! Callers address tables by string; [`TableName`] is the closed set of names
//! the registry can ever hold. Parsing is an exact, case-sensitive match so
//! `"Clients"` or `"clients "` never resolve.

use std::fmt;
use std::str::FromStr;

/// Logical name of a ClientFlow table.
///
/// # Examples
/// ```
/// use clientflow::domain::TableName;
///
/// let name: TableName = "weekly_reports".parse().expect("registered name");
/// assert_eq!(name, TableName::WeeklyReports);
/// assert!("WeeklyReports".parse::<TableName>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableName {
    /// Tenant organisations (agencies).
    Organizations,
    /// Per-user profile rows keyed by the auth user id.
    Profiles,
    /// Agency clients.
    Clients,
    /// Agency staff.
    Employees,
    /// Employee-to-client assignments.
    ClientAssignments,
    /// Weekly client status reports.
    WeeklyReports,
    /// Client budgets per period.
    Budgets,
    /// Logged employee hours.
    Timesheets,
    /// Latest computed health score per client.
    HealthScores,
    /// In-app notifications.
    Notifications,
}

impl TableName {
    /// Every logical table, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Organizations,
        Self::Profiles,
        Self::Clients,
        Self::Employees,
        Self::ClientAssignments,
        Self::WeeklyReports,
        Self::Budgets,
        Self::Timesheets,
        Self::HealthScores,
        Self::Notifications,
    ];

    /// The external string identifier for this table.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organizations => "organizations",
            Self::Profiles => "profiles",
            Self::Clients => "clients",
            Self::Employees => "employees",
            Self::ClientAssignments => "client_assignments",
            Self::WeeklyReports => "weekly_reports",
            Self::Budgets => "budgets",
            Self::Timesheets => "timesheets",
            Self::HealthScores => "health_scores",
            Self::Notifications => "notifications",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a logical table name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown table: {name}")]
pub struct UnknownTableName {
    /// The rejected input.
    pub name: String,
}

impl FromStr for TableName {
    type Err = UnknownTableName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownTableName { name: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn every_name_round_trips_through_its_string_form() {
        for name in TableName::ALL {
            assert_eq!(name.as_str().parse::<TableName>(), Ok(name));
            assert_eq!(name.to_string(), name.as_str());
        }
    }

    #[rstest]
    #[case("Clients")]
    #[case("clients ")]
    #[case("client")]
    #[case("")]
    #[case("weeklyReports")]
    fn near_misses_are_rejected(#[case] input: &str) {
        let err = input.parse::<TableName>().expect_err("near miss must not resolve");
        assert_eq!(err.name, input);
    }
}
