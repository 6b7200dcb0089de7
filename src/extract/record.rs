/// One therapist profile, as written to the output file
///
/// Only `region_code` and `display_name` are guaranteed; every other field
/// falls back to `None` or an empty list when the profile lacks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TherapistRecord {
    pub region_code: String,
    pub locality_name: Option<String>,
    pub street_address_1: Option<String>,
    /// None when absent or identical to `street_address_1`
    pub street_address_2: Option<String>,
    pub zip_1: Option<String>,
    /// None when absent or identical to `zip_1`
    pub zip_2: Option<String>,
    pub display_name: String,
    /// Credentials joined with ", "
    pub title: String,
    pub telephone: Option<String>,
    /// None when the profile has no insurance section at all
    pub insurance_providers: Option<Vec<String>>,
    pub specialties: Vec<String>,
    pub individual_session_price: Option<String>,
    pub couple_session_price: Option<String>,
    pub therapy_types: Vec<String>,
    pub client_ages_served: Vec<String>,
}

impl TherapistRecord {
    /// Column names in output order
    pub const COLUMNS: [&'static str; 15] = [
        "region_code",
        "locality_name",
        "street_address_1",
        "street_address_2",
        "zip_1",
        "zip_2",
        "display_name",
        "title",
        "telephone",
        "insurance_providers",
        "specialties",
        "individual_session_price",
        "couple_session_price",
        "therapy_types",
        "client_ages_served",
    ];
}
