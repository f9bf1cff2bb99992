//! Phone number validation and national formatting.

use frman_model::{PhoneOmission, PhoneOutcome};
use phonenumber::metadata::{DATABASE, Descriptors};
use phonenumber::{Mode, PhoneNumber, country};

use crate::error::{Result, TransformError};

/// Formats phone numbers for one default region.
#[derive(Debug, Clone)]
pub struct PhoneFormatter {
    region: country::Id,
}

impl PhoneFormatter {
    /// `region` is an ISO 3166 code such as `US`.
    pub fn new(region: &str) -> Result<Self> {
        let unknown = || TransformError::UnknownRegion {
            region: region.to_string(),
        };
        let id: country::Id = region.trim().to_uppercase().parse().map_err(|_| unknown())?;
        if DATABASE.by_id(id.as_ref()).is_none() {
            return Err(unknown());
        }
        Ok(Self { region: id })
    }

    pub fn region(&self) -> &str {
        self.region.as_ref()
    }

    /// Parse and render `raw` in national format. Numbers whose significant
    /// length is impossible for their country are omitted; no further
    /// validity check is applied, so reserved ranges such as 555 pass.
    pub fn format(&self, raw: &str) -> PhoneOutcome {
        let raw = raw.trim();
        if raw.is_empty() {
            return PhoneOutcome::Omitted(PhoneOmission::Blank);
        }
        let Ok(number) = phonenumber::parse(Some(self.region), raw) else {
            return PhoneOutcome::Omitted(PhoneOmission::Unparsable);
        };
        if !has_possible_length(&number) {
            return PhoneOutcome::Omitted(PhoneOmission::InvalidLength);
        }
        PhoneOutcome::Formatted(number.format().mode(Mode::National).to_string())
    }
}

fn has_possible_length(number: &PhoneNumber) -> bool {
    let national = number.national();
    let length = national.value().to_string().len() + usize::from(national.zeros());
    let Some(candidates) = DATABASE.by_code(&number.country().code()) else {
        return false;
    };
    candidates
        .iter()
        .flat_map(|meta| possible_lengths(meta.descriptors()))
        .any(|possible| usize::from(possible) == length)
}

/// Possible lengths across the general and per-type descriptors. The
/// general descriptor usually carries none of its own.
fn possible_lengths(descriptors: &Descriptors) -> Vec<u16> {
    let typed = [
        descriptors.fixed_line(),
        descriptors.mobile(),
        descriptors.toll_free(),
        descriptors.premium_rate(),
        descriptors.shared_cost(),
        descriptors.personal_number(),
        descriptors.voip(),
        descriptors.pager(),
        descriptors.uan(),
        descriptors.voicemail(),
    ];
    std::iter::once(descriptors.general())
        .chain(typed.into_iter().flatten())
        .flat_map(|descriptor| descriptor.possible_length().iter().copied())
        .collect()
}
