//! Protective Device Ratings
//!
//! Standard nominal ratings (In) for circuit protection. The selected device
//! must satisfy `Ib ≤ In ≤ Iz` (design current, device rating, derated cable
//! capacity).

use crate::units::Amps;

/// Standard device ratings (A), smallest first
pub const DEVICE_RATINGS: [u32; 19] = [
    6, 10, 16, 20, 25, 32, 40, 50, 63, 80, 100, 125, 160, 200, 250, 315, 400, 500, 630,
];

/// Ratings above this are moulded-case breakers rather than MCBs
pub const MAX_MCB_RATING: u32 = 125;

/// Smallest standard rating with `design_current ≤ In ≤ derated_capacity`.
pub fn select_rating(design_current: Amps, derated_capacity: Amps) -> Option<u32> {
    DEVICE_RATINGS.iter().copied().find(|&rating| {
        let rating = f64::from(rating);
        rating >= design_current.0 && rating <= derated_capacity.0
    })
}

/// Device description for a rating, e.g. "40A Type B MCB"
pub fn describe(rating: u32) -> String {
    if rating <= MAX_MCB_RATING {
        format!("{}A Type B MCB", rating)
    } else {
        format!("{}A MCCB", rating)
    }
}
