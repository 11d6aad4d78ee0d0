use crate::domain::model::{CountryId, Division};

/// Divisions belonging to `country_id`, in the order of the source list.
pub fn divisions_for_country(divisions: &[Division], country_id: CountryId) -> Vec<Division> {
    divisions
        .iter()
        .filter(|division| division.country_id == country_id)
        .cloned()
        .collect()
}
