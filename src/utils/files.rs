//! File helpers shared by the JSON store and the config manager.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Component, Path, PathBuf},
};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use super::paths::ensure_dir;

const TMP_SUFFIX: &str = "tmp";
pub const BACKUP_EXTENSION: &str = "json";
/// Millisecond precision keeps backups taken within one second ordered.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const SEQUENCE_SEPARATOR: char = '-';

pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to a sibling temp file, then renames it over `path`.
pub fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.flush()?;
    }
    fs::rename(&tmp, path)
}

/// Lower-case, dash-separated slug of a backup note, or `None` when nothing
/// usable remains.
pub fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Builds `<prefix>_<YYYYMMDD>_<HHMMSSmmm>[_<note>].json`.
pub fn backup_file_name(prefix: &str, at: DateTime<Utc>, note: Option<&str>) -> String {
    sequenced_backup_name(prefix, at, 1, note)
}

fn sequenced_backup_name(
    prefix: &str,
    at: DateTime<Utc>,
    sequence: u32,
    note: Option<&str>,
) -> String {
    let mut name = format!("{}_{}", prefix, at.format(BACKUP_TIMESTAMP_FORMAT));
    if sequence > 1 {
        name.push(SEQUENCE_SEPARATOR);
        name.push_str(&sequence.to_string());
    }
    if let Some(label) = sanitize_note(note) {
        name.push('_');
        name.push_str(&label);
    }
    name.push('.');
    name.push_str(BACKUP_EXTENSION);
    name
}

/// Creation order of a backup: its timestamp, then its sequence within
/// that millisecond.
pub fn parse_backup_key(name: &str) -> Option<(DateTime<Utc>, u32)> {
    let stem = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let mut parts = stem.split('_');
    parts.next()?;
    let date_part = parts.next()?;
    let time_field = parts.next()?;
    let (time_part, sequence) = match time_field.split_once(SEQUENCE_SEPARATOR) {
        Some((time, seq)) if !seq.is_empty() && seq.chars().all(|c| c.is_ascii_digit()) => {
            (time, seq.parse::<u32>().ok()?)
        }
        Some(_) => return None,
        None => (time_field, 1),
    };
    if !is_digits(date_part, 8) || !is_digits(time_part, 9) {
        return None;
    }
    let raw = format!("{}{}", date_part, &time_part[..6]);
    let millis: i64 = time_part[6..].parse().ok()?;
    let naive = NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S").ok()?;
    let at = DateTime::from_naive_utc_and_offset(naive, Utc) + Duration::milliseconds(millis);
    Some((at, sequence))
}

/// Extracts the timestamp from a name produced by [`backup_file_name`].
pub fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    parse_backup_key(name).map(|(at, _)| at)
}

/// Backup names in `dir` ending in `.json`, most recently created first.
pub fn list_backup_names(dir: &Path) -> io::Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            entries.push(name.to_string());
        }
    }
    entries.sort_by(|a, b| {
        parse_backup_key(b)
            .cmp(&parse_backup_key(a))
            .then_with(|| b.cmp(a))
    });
    Ok(entries)
}

/// Picks the name for a new backup in `dir`. A backup sharing the same
/// millisecond gets the next sequence number, whatever its note.
pub fn next_backup_name(
    dir: &Path,
    prefix: &str,
    at: DateTime<Utc>,
    note: Option<&str>,
) -> io::Result<String> {
    let base = backup_file_name(prefix, at, note);
    let Some((stamp, _)) = parse_backup_key(&base) else {
        return Ok(base);
    };
    let taken = list_backup_names(dir)?
        .iter()
        .filter(|name| name.starts_with(&format!("{}_", prefix)))
        .filter_map(|name| parse_backup_key(name))
        .filter(|(taken_at, _)| *taken_at == stamp)
        .map(|(_, sequence)| sequence)
        .max();
    Ok(match taken {
        Some(last) => sequenced_backup_name(prefix, at, last + 1, note),
        None => base,
    })
}

/// Rejects anything but a bare file name, so a backup name cannot reach
/// outside its backups directory.
pub fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn note_is_slugged() {
        assert_eq!(
            sanitize_note(Some("  Before Import!! v2 ")),
            Some("before-import-v2".into())
        );
        assert_eq!(sanitize_note(Some("???")), None);
        assert_eq!(sanitize_note(None), None);
    }

    #[test]
    fn backup_names_carry_parseable_timestamps() {
        let at = Utc.with_ymd_and_hms(2024, 6, 5, 14, 30, 9).unwrap() + Duration::milliseconds(42);
        let name = backup_file_name("snapshot", at, Some("month end"));
        assert_eq!(name, "snapshot_20240605_143009042_month-end.json");
        assert_eq!(parse_backup_key(&name), Some((at, 1)));
        assert_eq!(parse_backup_timestamp("notes.json"), None);
        assert_eq!(parse_backup_timestamp("snapshot_20240605_143009.json"), None);
    }

    #[test]
    fn same_millisecond_backups_get_increasing_sequences() {
        let dir = tempfile::tempdir().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 6, 5, 14, 30, 9).unwrap();
        let first = next_backup_name(dir.path(), "snapshot", at, Some("zeta")).unwrap();
        fs::write(dir.path().join(&first), "{}").unwrap();
        let second = next_backup_name(dir.path(), "snapshot", at, Some("alpha")).unwrap();
        assert_eq!(second, "snapshot_20240605_143009000-2_alpha.json");
        fs::write(dir.path().join(&second), "{}").unwrap();
        let third = next_backup_name(dir.path(), "snapshot", at, None).unwrap();
        assert_eq!(third, "snapshot_20240605_143009000-3.json");
        fs::write(dir.path().join(&third), "{}").unwrap();

        assert_eq!(
            list_backup_names(dir.path()).unwrap(),
            vec![third, second, first]
        );
    }

    #[test]
    fn listing_orders_by_creation_not_note() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "snapshot_20240605_143009000_zeta.json",
            "snapshot_20240605_143009001_alpha.json",
            "snapshot_20240605_143008999_zz.json",
        ] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        let names = list_backup_names(dir.path()).unwrap();
        assert_eq!(names[0], "snapshot_20240605_143009001_alpha.json");
        assert_eq!(names[2], "snapshot_20240605_143008999_zz.json");
    }

    #[test]
    fn only_bare_names_are_plain() {
        assert!(is_plain_file_name("snapshot_20240605_143009000.json"));
        assert!(!is_plain_file_name("../data/blackfinance_budgets.json"));
        assert!(!is_plain_file_name("nested/file.json"));
        assert!(!is_plain_file_name("..\\file.json"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name("/etc/passwd"));
    }

    #[test]
    fn write_atomic_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("value.json");
        write_atomic(&path, "{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!tmp_path(&path).exists());
    }
}
