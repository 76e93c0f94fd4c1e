//! Role-keyed dashboards and their navigation entries.

use bda_core::model::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardKind {
    Individual,
    TrainingPartner,
    DevelopmentPartner,
    Admin,
}

/// Where a navigation entry leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Dashboard,
    MockExams,
    /// Feature outside this application; rendered as a disabled label.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub label_key: &'static str,
    pub target: NavTarget,
}

const fn entry(label_key: &'static str, target: NavTarget) -> NavEntry {
    NavEntry { label_key, target }
}

const INDIVIDUAL_NAV: &[NavEntry] = &[
    entry("nav.dashboard", NavTarget::Dashboard),
    entry("nav.myBooks", NavTarget::Unavailable),
    entry("nav.certificationExams", NavTarget::Unavailable),
    entry("nav.mockExams", NavTarget::MockExams),
    entry("nav.myCertifications", NavTarget::Unavailable),
    entry("nav.pdcs", NavTarget::Unavailable),
    entry("nav.resources", NavTarget::Unavailable),
    entry("nav.helpCenter", NavTarget::Unavailable),
];

const TRAINING_PARTNER_NAV: &[NavEntry] = &[
    entry("nav.dashboard", NavTarget::Dashboard),
    entry("nav.candidates", NavTarget::Unavailable),
    entry("nav.vouchers", NavTarget::Unavailable),
    entry("nav.trainings", NavTarget::Unavailable),
    entry("nav.reports", NavTarget::Unavailable),
    entry("nav.helpCenter", NavTarget::Unavailable),
];

const DEVELOPMENT_PARTNER_NAV: &[NavEntry] = &[
    entry("nav.dashboard", NavTarget::Dashboard),
    entry("nav.programs", NavTarget::Unavailable),
    entry("nav.pdcActivities", NavTarget::Unavailable),
    entry("nav.reports", NavTarget::Unavailable),
    entry("nav.helpCenter", NavTarget::Unavailable),
];

const ADMIN_NAV: &[NavEntry] = &[
    entry("nav.dashboard", NavTarget::Dashboard),
    entry("nav.users", NavTarget::Unavailable),
    entry("nav.examManagement", NavTarget::Unavailable),
    entry("nav.tickets", NavTarget::Unavailable),
    entry("nav.reports", NavTarget::Unavailable),
];

#[must_use]
pub fn dashboard_for(role: Role) -> DashboardKind {
    match role {
        Role::Individual => DashboardKind::Individual,
        Role::TrainingPartner => DashboardKind::TrainingPartner,
        Role::DevelopmentPartner => DashboardKind::DevelopmentPartner,
        Role::Admin => DashboardKind::Admin,
    }
}

impl DashboardKind {
    #[must_use]
    pub fn title_key(self) -> &'static str {
        match self {
            DashboardKind::Individual => "dashboard.individual",
            DashboardKind::TrainingPartner => "dashboard.trainingPartner",
            DashboardKind::DevelopmentPartner => "dashboard.developmentPartner",
            DashboardKind::Admin => "dashboard.admin",
        }
    }

    #[must_use]
    pub fn nav_entries(self) -> &'static [NavEntry] {
        match self {
            DashboardKind::Individual => INDIVIDUAL_NAV,
            DashboardKind::TrainingPartner => TRAINING_PARTNER_NAV,
            DashboardKind::DevelopmentPartner => DEVELOPMENT_PARTNER_NAV,
            DashboardKind::Admin => ADMIN_NAV,
        }
    }

    #[must_use]
    pub fn offers_mock_exams(self) -> bool {
        self.nav_entries()
            .iter()
            .any(|entry| entry.target == NavTarget::MockExams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_maps_to_its_own_dashboard() {
        let kinds: Vec<DashboardKind> = Role::ALL.into_iter().map(dashboard_for).collect();
        assert_eq!(
            kinds,
            vec![
                DashboardKind::Individual,
                DashboardKind::TrainingPartner,
                DashboardKind::DevelopmentPartner,
                DashboardKind::Admin,
            ]
        );
    }

    #[test]
    fn mock_exams_follow_role_permission() {
        for role in Role::ALL {
            assert_eq!(
                dashboard_for(role).offers_mock_exams(),
                role.can_take_exams(),
                "{role:?}"
            );
        }
    }

    #[test]
    fn every_dashboard_starts_with_home() {
        for role in Role::ALL {
            let first = dashboard_for(role).nav_entries()[0];
            assert_eq!(first.target, NavTarget::Dashboard);
        }
    }
}
