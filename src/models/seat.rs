use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatZone {
    Vip,
    Regular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Selected,
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: String,
    pub row: i32,
    pub number: i32,
    pub zone: SeatZone,
    pub status: SeatStatus,
}

/// Canonical seat identifier, derived from the grid position.
pub fn seat_id(row: i32, number: i32) -> String {
    format!("R{}C{}", row, number)
}

/// Inverse of [`seat_id`].
pub fn parse_seat_id(id: &str) -> Option<(i32, i32)> {
    let rest = id.strip_prefix('R')?;
    let (row, number) = rest.split_once('C')?;
    Some((row.parse().ok()?, number.parse().ok()?))
}

/// Seating layout for one occurrence. `taken_seats` is the server-provided
/// list; per-seat status is computed against the local selection and is
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    pub occurrence_id: i64,
    pub rows: i32,
    pub seats_per_row: i32,
    pub vip_rows: Vec<i32>,
    pub taken_seats: Vec<String>,
}

impl SeatMap {
    pub fn zone_of(&self, row: i32) -> SeatZone {
        if self.vip_rows.contains(&row) {
            SeatZone::Vip
        } else {
            SeatZone::Regular
        }
    }

    pub fn contains(&self, row: i32, number: i32) -> bool {
        row >= 1 && row <= self.rows && number >= 1 && number <= self.seats_per_row
    }

    /// Materialize the full grid, diffing the taken list against the
    /// currently selected set.
    pub fn build_seats(&self, selected: &HashSet<String>) -> Vec<Seat> {
        let taken: HashSet<&str> = self.taken_seats.iter().map(String::as_str).collect();
        let mut seats = Vec::with_capacity((self.rows * self.seats_per_row) as usize);

        for row in 1..=self.rows {
            for number in 1..=self.seats_per_row {
                let id = seat_id(row, number);
                let status = if taken.contains(id.as_str()) {
                    SeatStatus::Unavailable
                } else if selected.contains(&id) {
                    SeatStatus::Selected
                } else {
                    SeatStatus::Available
                };
                seats.push(Seat {
                    id,
                    row,
                    number,
                    zone: self.zone_of(row),
                    status,
                });
            }
        }
        seats
    }
}
