use crate::fleet::Load;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlookDay {
    pub date: NaiveDate,
    pub expected_pickups: usize,
    pub expected_deliveries: usize,
    pub drivers_scheduled: usize,
    pub trucks_deployed: usize,
    pub estimated_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlook {
    pub yesterday: OutlookDay,
    pub today: OutlookDay,
    pub tomorrow: OutlookDay,
}

impl Outlook {
    pub fn days(&self) -> [&OutlookDay; 3] {
        [&self.yesterday, &self.today, &self.tomorrow]
    }
}

/// Projects pickups, deliveries and delivery revenue around `report_date`.
///
/// Each day is an independent pass over every load, whatever its status.
pub(crate) fn project(
    loads: &[Load],
    report_date: NaiveDate,
    drivers_scheduled: usize,
    trucks_deployed: usize,
) -> Outlook {
    let day = |offset: i64| {
        project_day(
            loads,
            report_date + Duration::days(offset),
            drivers_scheduled,
            trucks_deployed,
        )
    };

    Outlook {
        yesterday: day(-1),
        today: day(0),
        tomorrow: day(1),
    }
}

fn project_day(
    loads: &[Load],
    date: NaiveDate,
    drivers_scheduled: usize,
    trucks_deployed: usize,
) -> OutlookDay {
    let mut outlook = OutlookDay {
        date,
        expected_pickups: 0,
        expected_deliveries: 0,
        drivers_scheduled,
        trucks_deployed,
        estimated_revenue: 0.0,
    };

    for load in loads {
        if load.pickup_date == Some(date) {
            outlook.expected_pickups += 1;
        }
        if load.delivery_date == Some(date) {
            outlook.expected_deliveries += 1;
            outlook.estimated_revenue += load.rate_or_zero();
        }
    }

    outlook
}
