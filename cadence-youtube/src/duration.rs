/// Parse an ISO-8601 duration as used by the Data API (`PT4M33S`, `PT1H2M`, `P1DT3S`)
/// into whole seconds.
///
/// Returns `None` if the string is not a duration. Live streams report `P0D`, which
/// parses to zero.
pub fn parse_iso8601_duration(duration: &str) -> Option<u32> {
    let rest = duration.strip_prefix('P')?;
    let (date, time) = rest.split_once('T').unwrap_or((rest, ""));

    let mut total: u32 = 0;
    for (value, unit) in components(date)? {
        let scale = match unit {
            'W' => 7 * 86_400,
            'D' => 86_400,
            _ => return None,
        };
        total = total.saturating_add(value.saturating_mul(scale));
    }
    for (value, unit) in components(time)? {
        let scale = match unit {
            'H' => 3_600,
            'M' => 60,
            'S' => 1,
            _ => return None,
        };
        total = total.saturating_add(value.saturating_mul(scale));
    }
    Some(total)
}

fn components(s: &str) -> Option<Vec<(u32, char)>> {
    let mut out = vec![];
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() {
            continue;
        }
        if start == i {
            return None;
        }
        out.push((s[start..i].parse().ok()?, c));
        start = i + c.len_utf8();
    }
    // Trailing digits without a unit
    if start != s.len() {
        return None;
    }
    Some(out)
}
