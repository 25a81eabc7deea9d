use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingStatus {
    #[default]
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
    QualifyingSurvivingSpouse,
}

impl FilingStatus {
    /// Every filing status, in IRS form order.
    pub const ALL: [FilingStatus; 5] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::MarriedFilingSeparately,
        Self::HeadOfHousehold,
        Self::QualifyingSurvivingSpouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
            Self::QualifyingSurvivingSpouse => "QSS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
            Self::QualifyingSurvivingSpouse => "Qualifying Surviving Spouse",
        }
    }

    /// Whether the age/blindness add-on uses the married amount.
    ///
    /// A qualifying surviving spouse takes the married add-on even though
    /// the base deduction is looked up separately.
    pub fn uses_married_additional_deduction(&self) -> bool {
        matches!(
            self,
            Self::MarriedFilingJointly
                | Self::MarriedFilingSeparately
                | Self::QualifyingSurvivingSpouse
        )
    }
}

/// One value per filing status.
///
/// Rate tables are keyed by filing status almost everywhere; this keeps the
/// lookup total (no missing-key case) instead of going through a map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByFilingStatus<T> {
    pub single: T,
    pub married_filing_jointly: T,
    pub married_filing_separately: T,
    pub head_of_household: T,
    pub qualifying_surviving_spouse: T,
}

impl<T> ByFilingStatus<T> {
    pub fn get(
        &self,
        status: FilingStatus,
    ) -> &T {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedFilingJointly => &self.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => &self.married_filing_separately,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
            FilingStatus::QualifyingSurvivingSpouse => &self.qualifying_surviving_spouse,
        }
    }

    pub fn get_mut(
        &mut self,
        status: FilingStatus,
    ) -> &mut T {
        match status {
            FilingStatus::Single => &mut self.single,
            FilingStatus::MarriedFilingJointly => &mut self.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => &mut self.married_filing_separately,
            FilingStatus::HeadOfHousehold => &mut self.head_of_household,
            FilingStatus::QualifyingSurvivingSpouse => &mut self.qualifying_surviving_spouse,
        }
    }
}

impl<T: Clone> ByFilingStatus<T> {
    /// Same value for every status.
    pub fn uniform(value: T) -> Self {
        Self {
            single: value.clone(),
            married_filing_jointly: value.clone(),
            married_filing_separately: value.clone(),
            head_of_household: value.clone(),
            qualifying_surviving_spouse: value,
        }
    }
}
