use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::DataError;

/// Farmer experience level captured at onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FarmerType {
    New,
    Experienced,
}

/// Farm size band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FarmSize {
    Small,
    Medium,
    Large,
}

/// Farm profile captured at registration and edited through the
/// farm-details form.
///
/// Which fields are required depends on the farmer type: new farmers
/// need crops, farm size, location, crop phase and last manure date;
/// experienced farmers additionally need crop age and fertilizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerProfile {
    pub farmer_type: FarmerType,
    pub location: String,
    pub selected_crops: BTreeSet<String>,
    pub farm_size: Option<FarmSize>,
    pub crop_age: Option<String>,
    pub last_manure: Option<NaiveDate>,
    pub fertilizer: Option<String>,
    pub crop_phase: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl FarmerProfile {
    pub fn new(farmer_type: FarmerType) -> Self {
        Self {
            farmer_type,
            location: String::new(),
            selected_crops: BTreeSet::new(),
            farm_size: None,
            crop_age: None,
            last_manure: None,
            fertilizer: None,
            crop_phase: None,
            updated_at: Utc::now(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_crops<I, S>(mut self, crops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_crops = crops.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_farm_size(mut self, size: FarmSize) -> Self {
        self.farm_size = Some(size);
        self
    }

    pub fn with_crop_phase(mut self, phase: impl Into<String>) -> Self {
        self.crop_phase = Some(phase.into());
        self
    }

    pub fn with_last_manure(mut self, date: NaiveDate) -> Self {
        self.last_manure = Some(date);
        self
    }

    pub fn with_crop_age(mut self, age: impl Into<String>) -> Self {
        self.crop_age = Some(age.into());
        self
    }

    pub fn with_fertilizer(mut self, fertilizer: impl Into<String>) -> Self {
        self.fertilizer = Some(fertilizer.into());
        self
    }

    /// Returns every required field that is absent, using the wire
    /// names the form and backend share.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.selected_crops.is_empty() {
            missing.push("selectedCrops");
        }
        if self.farm_size.is_none() {
            missing.push("farmSize");
        }
        if self.location.trim().is_empty() {
            missing.push("location");
        }
        if is_blank(&self.crop_phase) {
            missing.push("cropPhase");
        }
        if self.last_manure.is_none() {
            missing.push("lastManure");
        }

        if self.farmer_type == FarmerType::Experienced {
            if is_blank(&self.crop_age) {
                missing.push("cropAge");
            }
            if is_blank(&self.fertilizer) {
                missing.push("fertilizer");
            }
        }

        missing
    }

    /// Validates the profile for submission, reporting every missing
    /// field in one pass.
    pub fn validate(&self) -> Result<(), DataError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DataError::Validation(
                missing.into_iter().map(String::from).collect(),
            ))
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
