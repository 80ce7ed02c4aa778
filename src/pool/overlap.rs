//! Overlapping subnet CIDR detection.

use crate::models::Cidr;

/// First accepted network sharing any address with `candidate`.
pub fn find_overlap<'a>(existing: &'a [Cidr], candidate: &Cidr) -> Option<&'a Cidr> {
    let found = existing.iter().find(|cidr| cidr.overlaps(candidate));
    if let Some(cidr) = found {
        log::warn!(
            "Overlapping subnet {candidate} with {cidr} ({}-{} vs {}-{})",
            candidate.lo(),
            candidate.hi(),
            cidr.lo(),
            cidr.hi()
        );
    }
    found
}

/// True if `candidate` overlaps any of the `existing` networks.
pub fn check_overlap(existing: &[Cidr], candidate: &Cidr) -> bool {
    find_overlap(existing, candidate).is_some()
}
