//! Field rectangles on the scanned reference pages.
//!
//! Coordinates are pixels with the origin top left, measured on 1128×1584
//! scans of the 2015 templates and 1057×1496 scans of the 2021 templates.

use super::{CertificateKind, FieldKey};
use crate::models::certificate::SignerRole;

/// Axis-aligned rectangle on the reference page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ZoneRect {
    /// Rectangle scaled by `(sx, sy)` and grown by `pad` on every side.
    pub fn scaled(&self, sx: f32, sy: f32, pad: f32) -> (f32, f32, f32, f32) {
        (
            self.x * sx - pad,
            self.y * sy - pad,
            (self.x + self.w) * sx + pad,
            (self.y + self.h) * sy + pad,
        )
    }
}

/// What the text inside a zone is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneTarget {
    Field(FieldKey),
    /// A checkbox that, when ticked, names the signer's role.
    Checkbox(SignerRole),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub target: ZoneTarget,
    pub rect: ZoneRect,
}

/// Zones of one template and the page size they were measured on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneMap {
    pub width: f32,
    pub height: f32,
    pub zones: &'static [Zone],
}

const fn field(key: FieldKey, x: f32, y: f32, w: f32, h: f32) -> Zone {
    Zone {
        target: ZoneTarget::Field(key),
        rect: ZoneRect { x, y, w, h },
    }
}

const fn checkbox(role: SignerRole, x: f32, y: f32, w: f32, h: f32) -> Zone {
    Zone {
        target: ZoneTarget::Checkbox(role),
        rect: ZoneRect { x, y, w, h },
    }
}

const SIZE_2015: (f32, f32) = (1128.0, 1584.0);
const SIZE_2021: (f32, f32) = (1057.0, 1496.0);

// Appendices 3 and 4 share one layout.
static AUSK_KLIN_2015: [Zone; 10] = [
    field(FieldKey::LastName, 142.0, 360.0, 422.0, 38.0),
    field(FieldKey::FirstName, 568.0, 360.0, 422.0, 38.0),
    field(FieldKey::PersonalId, 142.0, 414.0, 290.0, 36.0),
    field(FieldKey::Specialty, 142.0, 484.0, 848.0, 46.0),
    field(FieldKey::CompetencyCodes, 142.0, 536.0, 848.0, 48.0),
    field(FieldKey::SubjectAndPeriod, 142.0, 616.0, 848.0, 48.0),
    field(FieldKey::Description, 142.0, 700.0, 848.0, 508.0),
    field(FieldKey::SignerSpecialty, 142.0, 1314.0, 848.0, 48.0),
    field(FieldKey::SignerSite, 142.0, 1367.0, 422.0, 47.0),
    field(FieldKey::SignerName, 568.0, 1420.0, 422.0, 48.0),
];

static KURS_2015: [Zone; 13] = [
    field(FieldKey::LastName, 142.0, 360.0, 422.0, 38.0),
    field(FieldKey::FirstName, 568.0, 360.0, 422.0, 38.0),
    field(FieldKey::PersonalId, 142.0, 414.0, 290.0, 36.0),
    field(FieldKey::Specialty, 142.0, 484.0, 848.0, 46.0),
    field(FieldKey::CompetencyCodes, 142.0, 536.0, 848.0, 48.0),
    field(FieldKey::SubjectAndPeriod, 142.0, 616.0, 848.0, 48.0),
    field(FieldKey::CourseLeader, 142.0, 668.0, 848.0, 40.0),
    field(FieldKey::Description, 142.0, 720.0, 848.0, 488.0),
    checkbox(SignerRole::CourseLeader, 142.0, 1220.0, 160.0, 30.0),
    checkbox(SignerRole::Supervisor, 322.0, 1220.0, 160.0, 30.0),
    field(FieldKey::SignerSpecialty, 142.0, 1280.0, 848.0, 40.0),
    field(FieldKey::SignerSite, 142.0, 1326.0, 422.0, 40.0),
    field(FieldKey::SignerName, 568.0, 1372.0, 422.0, 44.0),
];

// Appendices 6 and 7 share one layout.
static UTV_SKRIFTLIGT_2015: [Zone; 10] = [
    field(FieldKey::LastName, 142.0, 360.0, 422.0, 38.0),
    field(FieldKey::FirstName, 568.0, 360.0, 422.0, 38.0),
    field(FieldKey::PersonalId, 142.0, 414.0, 290.0, 36.0),
    field(FieldKey::Specialty, 142.0, 484.0, 848.0, 46.0),
    field(FieldKey::CompetencyCodes, 142.0, 536.0, 848.0, 48.0),
    field(FieldKey::Subject, 142.0, 616.0, 848.0, 48.0),
    field(FieldKey::Description, 142.0, 668.0, 848.0, 540.0),
    field(FieldKey::SignerSpecialty, 142.0, 1220.0, 848.0, 40.0),
    field(FieldKey::SignerSite, 142.0, 1266.0, 422.0, 40.0),
    field(FieldKey::SignerName, 568.0, 1312.0, 422.0, 44.0),
];

static AUSK_2021: [Zone; 11] = [
    field(FieldKey::LastName, 136.0, 400.0, 467.0, 52.0),
    field(FieldKey::FirstName, 608.0, 400.0, 365.0, 52.0),
    field(FieldKey::PersonalId, 136.0, 472.0, 321.0, 52.0),
    field(FieldKey::Specialty, 460.0, 472.0, 513.0, 52.0),
    field(FieldKey::CompetencyCodes, 136.0, 578.0, 467.0, 53.0),
    field(FieldKey::SubjectAndPeriod, 136.0, 688.0, 547.0, 52.0),
    field(FieldKey::Period, 688.0, 688.0, 285.0, 52.0),
    field(FieldKey::Description, 136.0, 764.0, 837.0, 321.0),
    field(FieldKey::SignerName, 136.0, 1262.0, 511.0, 52.0),
    field(FieldKey::SignerSpecialty, 136.0, 1334.0, 837.0, 52.0),
    field(FieldKey::SignerSite, 136.0, 1406.0, 837.0, 52.0),
];

// Converted from the PDF field positions of the fillable template.
static KLIN_2021: [Zone; 11] = [
    field(FieldKey::LastName, 76.0, 402.0, 255.0, 15.0),
    field(FieldKey::FirstName, 331.0, 402.0, 255.0, 15.0),
    field(FieldKey::PersonalId, 76.0, 470.0, 177.0, 15.0),
    field(FieldKey::Specialty, 253.0, 470.0, 322.0, 15.0),
    field(FieldKey::CompetencyCodes, 76.0, 573.0, 480.0, 40.0),
    field(FieldKey::SubjectAndPeriod, 76.0, 681.0, 299.0, 15.0),
    field(FieldKey::Period, 375.0, 681.0, 180.0, 15.0),
    field(FieldKey::Description, 76.0, 700.0, 480.0, 300.0),
    field(FieldKey::SignerName, 76.0, 1227.0, 279.0, 15.0),
    field(FieldKey::SignerSpecialty, 76.0, 1294.0, 429.0, 15.0),
    field(FieldKey::SignerSite, 76.0, 1360.0, 429.0, 15.0),
];

static KURS_2021: [Zone; 12] = [
    field(FieldKey::LastName, 136.0, 400.0, 467.0, 52.0),
    field(FieldKey::FirstName, 608.0, 400.0, 365.0, 52.0),
    field(FieldKey::PersonalId, 136.0, 472.0, 321.0, 52.0),
    field(FieldKey::Specialty, 460.0, 472.0, 513.0, 52.0),
    field(FieldKey::CompetencyCodes, 136.0, 578.0, 467.0, 53.0),
    field(FieldKey::Subject, 136.0, 656.0, 837.0, 52.0),
    field(FieldKey::Description, 136.0, 730.0, 837.0, 355.0),
    checkbox(SignerRole::Supervisor, 136.0, 1120.0, 160.0, 30.0),
    checkbox(SignerRole::CourseLeader, 316.0, 1120.0, 160.0, 30.0),
    field(FieldKey::SignerName, 136.0, 1262.0, 511.0, 52.0),
    field(FieldKey::SignerSpecialty, 136.0, 1334.0, 837.0, 52.0),
    field(FieldKey::SignerSite, 136.0, 1406.0, 837.0, 52.0),
];

static UTV_2021: [Zone; 10] = [
    field(FieldKey::LastName, 136.0, 400.0, 467.0, 52.0),
    field(FieldKey::FirstName, 608.0, 400.0, 365.0, 52.0),
    field(FieldKey::PersonalId, 136.0, 472.0, 321.0, 52.0),
    field(FieldKey::Specialty, 460.0, 472.0, 513.0, 52.0),
    field(FieldKey::CompetencyCodes, 136.0, 578.0, 467.0, 53.0),
    field(FieldKey::Subject, 136.0, 656.0, 837.0, 52.0),
    field(FieldKey::Description, 136.0, 730.0, 837.0, 355.0),
    field(FieldKey::SignerName, 136.0, 1262.0, 511.0, 52.0),
    field(FieldKey::SignerSpecialty, 136.0, 1334.0, 837.0, 52.0),
    field(FieldKey::SignerSite, 136.0, 1406.0, 837.0, 52.0),
];

const fn map(size: (f32, f32), zones: &'static [Zone]) -> ZoneMap {
    ZoneMap {
        width: size.0,
        height: size.1,
        zones,
    }
}

static MAP_AUSK_KLIN_2015: ZoneMap = map(SIZE_2015, &AUSK_KLIN_2015);
static MAP_KURS_2015: ZoneMap = map(SIZE_2015, &KURS_2015);
static MAP_UTV_SKRIFTLIGT_2015: ZoneMap = map(SIZE_2015, &UTV_SKRIFTLIGT_2015);
static MAP_AUSK_2021: ZoneMap = map(SIZE_2021, &AUSK_2021);
static MAP_KLIN_2021: ZoneMap = map(SIZE_2021, &KLIN_2021);
static MAP_KURS_2021: ZoneMap = map(SIZE_2021, &KURS_2021);
static MAP_UTV_2021: ZoneMap = map(SIZE_2021, &UTV_2021);

/// Zone map for a kind, when its template has been measured.
pub fn zone_map(kind: CertificateKind) -> Option<&'static ZoneMap> {
    match kind {
        CertificateKind::Ausk2015 | CertificateKind::Klin2015 => Some(&MAP_AUSK_KLIN_2015),
        CertificateKind::Kurs2015 => Some(&MAP_KURS_2015),
        CertificateKind::Utv2015 | CertificateKind::Skriftligt2015 => Some(&MAP_UTV_SKRIFTLIGT_2015),
        CertificateKind::Ausk2021 => Some(&MAP_AUSK_2021),
        CertificateKind::Klin2021 => Some(&MAP_KLIN_2021),
        CertificateKind::Kurs2021 => Some(&MAP_KURS_2021),
        CertificateKind::Utv2021 => Some(&MAP_UTV_2021),
        _ => None,
    }
}
