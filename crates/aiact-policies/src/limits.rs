// SPDX-License-Identifier: Apache-2.0

pub const SCORE_MAX: u8 = 100;

pub const MAX_BONUS_PER_SIGNAL: u8 = 5;
pub const MAX_VALIDITY_MONTHS: u32 = 36;
pub const MAX_REVERIFICATION_INTERVAL_DAYS: u32 = 366;
pub const MAX_LOGGING_WINDOW_HOURS: u32 = 24 * 30;
