//! Content-file codes: `LL-LL-NNNN-NNNN-NN-NN-NN[.ext]`.
//!
//! Codes identify individual content files (e.g. `A-A-2503-0080-01-00-01.pdf`)
//! and use dashes only, so they never collide with the underscore grammar
//! used for folders.

use drivehub_entity::hierarchy::ContentCode;

/// Decompose a content-file code, or return `None` if `name` is not one.
pub fn parse_content_code(name: &str) -> Option<ContentCode> {
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext)) if is_extension(ext) => (stem, Some(ext.to_ascii_lowercase())),
        Some(_) => return None,
        None => (name, None),
    };

    let segments: Vec<&str> = stem.split('-').collect();
    let [l1, l2, period, serial, p1, p2, p3] = segments.as_slice() else {
        return None;
    };

    if !is_letters(l1) || !is_letters(l2) {
        return None;
    }
    if !is_digits(period, 4) || !is_digits(serial, 4) {
        return None;
    }
    let parts = [p1, p2, p3]
        .into_iter()
        .map(|p| is_digits(p, 2).then(|| p.parse::<u32>().ok()).flatten())
        .collect::<Option<Vec<u32>>>()?;

    Some(ContentCode {
        letters: vec![l1.to_string(), l2.to_string()],
        period: period.to_string(),
        serial: serial.parse().ok()?,
        parts,
        extension,
    })
}

fn is_letters(segment: &str) -> bool {
    (1..=2).contains(&segment.len()) && segment.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_digits(segment: &str, len: usize) -> bool {
    segment.len() == len && segment.chars().all(|c| c.is_ascii_digit())
}

fn is_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
}
