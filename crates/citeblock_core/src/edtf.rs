/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! EDTF date fields to CSL dates.
//!
//! Covers EDTF level 0 and the parts of level 1 that CSL can express:
//! qualifiers (`?`, `~`, `%`) become `circa`, seasons (21-24) become
//! `season`, and intervals become two-element `date-parts`. Years with
//! unspecified digits (`19XX`) have no CSL-JSON form and are kept literal.

use winnow::combinator::{alt, opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take;

use crate::item::CslDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdtfDate {
    year: i32,
    month: Option<u32>,
    season: Option<u8>,
    day: Option<u32>,
    qualified: bool,
}

impl EdtfDate {
    fn parts(&self) -> Vec<i32> {
        let mut parts = vec![self.year];
        if let Some(month) = self.month {
            parts.push(month as i32);
            if let Some(day) = self.day {
                parts.push(day as i32);
            }
        }
        parts
    }
}

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::default())
}

fn parse_qualifier(input: &mut &str) -> Result<bool, ErrMode<ContextError>> {
    Ok(opt(alt(('?', '~', '%'))).parse_next(input)?.is_some())
}

fn parse_year(input: &mut &str) -> Result<i32, ErrMode<ContextError>> {
    let negative = opt('-').parse_next(input)?.is_some();
    let digits = take(4_usize).parse_next(input)?;
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(backtrack());
    }
    let year: i32 = digits.parse().map_err(|_| backtrack())?;
    Ok(if negative { -year } else { year })
}

fn parse_two_digits(input: &mut &str) -> Result<u32, ErrMode<ContextError>> {
    take(2_usize)
        .try_map(|s: &str| s.parse::<u32>())
        .parse_next(input)
}

fn parse_date(input: &mut &str) -> Result<EdtfDate, ErrMode<ContextError>> {
    let year = parse_year.parse_next(input)?;
    let mut qualified = parse_qualifier.parse_next(input)?;

    let mut date = EdtfDate {
        year,
        month: None,
        season: None,
        day: None,
        qualified: false,
    };

    if let Some(value) = opt(preceded('-', parse_two_digits)).parse_next(input)? {
        match value {
            1..=12 => date.month = Some(value),
            21..=24 => date.season = Some((value - 20) as u8),
            _ => return Err(backtrack()),
        }
        qualified |= parse_qualifier.parse_next(input)?;

        if date.month.is_some() {
            if let Some(day) = opt(preceded('-', parse_two_digits)).parse_next(input)? {
                if !(1..=31).contains(&day) {
                    return Err(backtrack());
                }
                date.day = Some(day);
                qualified |= parse_qualifier.parse_next(input)?;
            }
        }
    }

    // Time of day carries nothing CSL can show.
    if input.starts_with('T') {
        *input = "";
    }

    date.qualified = qualified;
    Ok(date)
}

fn parse_interval_end(input: &mut &str) -> Result<Option<EdtfDate>, ErrMode<ContextError>> {
    if input.is_empty() || *input == ".." {
        *input = "";
        return Ok(None);
    }
    parse_date.map(Some).parse_next(input)
}

/// Parse an EDTF value into a CSL date, or `None` if it is not EDTF we can
/// represent.
pub fn parse_edtf(value: &str) -> Option<CslDate> {
    let mut input = value.trim();

    let (start, end) = if let Some(rest) = input.strip_prefix("../") {
        input = rest;
        (parse_date.parse_next(&mut input).ok()?, None)
    } else {
        let start = parse_date.parse_next(&mut input).ok()?;
        let end = match input.strip_prefix('/') {
            Some(rest) => {
                input = rest;
                parse_interval_end.parse_next(&mut input).ok()?
            }
            None => None,
        };
        (start, end)
    };

    if !input.is_empty() {
        return None;
    }

    let mut date = CslDate::from_parts(start.parts());
    date.season = start.season;
    date.circa = start.qualified;
    if let Some(end) = end {
        date.date_parts.push(end.parts());
        date.circa |= end.qualified;
    }
    Some(date)
}

/// Encode a date field: EDTF when possible, otherwise a literal date.
pub fn csl_date(value: &str) -> CslDate {
    parse_edtf(value).unwrap_or_else(|| CslDate::literal(value.trim()))
}
