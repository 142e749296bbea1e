// SPDX-License-Identifier: AGPL-3.0-or-later

//! Parsers for the compact argument formats of the record and view commands.
use anyhow::{anyhow, bail, Result};
use canvass::form::{AddressEntry, FormEntry};
use canvass::view::{FilterItem, Operator, SortDirection, SortItem};

/// Parses `field:operator[:value]` into a new filter.
///
/// The value may contain further colons, operators which ignore the value need none.
pub fn parse_filter(input: &str) -> Result<FilterItem> {
    let mut parts = input.splitn(3, ':');

    let field = parts.next().unwrap_or_default().trim();
    if field.is_empty() {
        bail!("Filter '{}' has no field, expected field:operator[:value]", input);
    }

    let operator: Operator = parts
        .next()
        .ok_or_else(|| anyhow!("Filter '{}' has no operator, expected field:operator[:value]", input))?
        .trim()
        .parse()?;

    let value = parts.next().unwrap_or_default();

    Ok(FilterItem::new(field, operator, value))
}

/// Parses `field[:asc|:desc]` into a sort item, ascending by default.
pub fn parse_sort(input: &str) -> Result<SortItem> {
    let (field, direction) = match input.split_once(':') {
        Some((field, direction)) => (field, direction.trim().parse()?),
        None => (input, SortDirection::Ascending),
    };

    let field = field.trim();
    if field.is_empty() {
        bail!("Sort '{}' has no field, expected field[:asc|:desc]", input);
    }

    Ok(SortItem {
        field: field.to_owned(),
        direction,
    })
}

/// Parses `key=value`.
pub fn parse_assignment(input: &str) -> Result<(String, String)> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected key=value, got '{}'", input))?;

    Ok((key.trim().to_owned(), value.to_owned()))
}

/// Parses `key=value[:type[:status]]` into an entry of a multi-valued field.
pub fn parse_entry(input: &str) -> Result<(String, FormEntry)> {
    let (key, rest) = parse_assignment(input)?;
    let mut parts = rest.splitn(3, ':');

    let value = parts.next().unwrap_or_default();
    let kind = parts.next().filter(|kind| !kind.is_empty());
    let status = parts.next().filter(|status| !status.is_empty());

    Ok((key, FormEntry::new(value, kind, status)))
}

/// Parses `key=street1|street2|city|state|postal_code[|type[|primary]]` into an address.
pub fn parse_address(input: &str) -> Result<(String, AddressEntry)> {
    let (key, rest) = parse_assignment(input)?;
    let parts: Vec<&str> = rest.split('|').map(str::trim).collect();

    if !(5..=7).contains(&parts.len()) {
        bail!(
            "Address '{}' needs street1|street2|city|state|postal_code[|type[|primary]]",
            rest
        );
    }

    let optional = |index: usize| {
        parts
            .get(index)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
    };

    let is_primary = match parts.get(6).copied() {
        None | Some("") => false,
        Some("primary") | Some("true") => true,
        Some(other) => bail!("Expected 'primary' as last address part, got '{}'", other),
    };

    Ok((
        key,
        AddressEntry {
            street1: parts[0].to_owned(),
            street2: optional(1),
            city: parts[2].to_owned(),
            state: parts[3].to_owned(),
            postal_code: parts[4].to_owned(),
            address_type: optional(5),
            is_primary,
        },
    ))
}
