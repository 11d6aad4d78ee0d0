use crate::domain::model::{CountryId, DivisionId};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Address,
    Country,
    Division,
    PostalCode,
    Phone,
}

impl FormField {
    /// Check and display order.
    pub const ALL: [FormField; 6] = [
        FormField::Name,
        FormField::Address,
        FormField::Country,
        FormField::Division,
        FormField::PostalCode,
        FormField::Phone,
    ];

    pub fn required_message(self) -> &'static str {
        match self {
            FormField::Name => "Name is required",
            FormField::Address => "Address is required",
            FormField::Country => "Country is required",
            FormField::Division => "State/Province is required",
            FormField::PostalCode => "Postal Code is required",
            FormField::Phone => "Phone Number is required",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Address => "address",
            FormField::Country => "country",
            FormField::Division => "state/province",
            FormField::PostalCode => "postal code",
            FormField::Phone => "phone",
        }
    }
}

/// Current contents of the edit form. Text is kept exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub phone: String,
    pub country: Option<CountryId>,
    pub division: Option<DivisionId>,
}

impl FormValues {
    pub fn is_filled(&self, field: FormField) -> bool {
        match field {
            FormField::Name => !self.name.trim().is_empty(),
            FormField::Address => !self.address.trim().is_empty(),
            FormField::PostalCode => !self.postal_code.trim().is_empty(),
            FormField::Phone => !self.phone.trim().is_empty(),
            FormField::Country => self.country.is_some(),
            FormField::Division => self.division.is_some(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<FormField, &'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.values().copied().collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Checks every field; each one that is blank or unselected gets its required message.
pub fn validate_fields(values: &FormValues) -> FieldErrors {
    let errors = FormField::ALL
        .iter()
        .filter(|field| !values.is_filled(**field))
        .map(|field| (*field, field.required_message()))
        .collect();
    FieldErrors { errors }
}
