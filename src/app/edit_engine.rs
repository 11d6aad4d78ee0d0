use crate::adapters::navigator::ScreenLog;
use crate::core::edit_form::{CustomerEditForm, SaveOutcome};
use crate::core::{CountryId, CustomerId, DivisionId, ReferenceDataProvider, Screen};
use crate::utils::error::Result;
use std::sync::Arc;

/// Field changes to apply before submitting. `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerEdits {
    pub name: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub country_id: Option<CountryId>,
    pub division_id: Option<DivisionId>,
}

impl CustomerEdits {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug)]
pub struct EditReport {
    pub outcome: SaveOutcome,
    pub open_warning: Option<String>,
    pub screen: Option<Screen>,
}

/// Drives one edit form from open to submit without a user in the loop.
pub struct EditEngine<P: ReferenceDataProvider> {
    provider: Arc<P>,
}

impl<P: ReferenceDataProvider> EditEngine<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn run(&self, customer_id: CustomerId, edits: &CustomerEdits) -> Result<EditReport> {
        tracing::info!("Editing customer {}", customer_id);

        let customer = self.provider.fetch_customer(customer_id).await?;
        let mut form =
            CustomerEditForm::load(Arc::clone(&self.provider), ScreenLog::new(), customer).await?;

        if let Some(name) = &edits.name {
            form.set_name(name.as_str())?;
        }
        if let Some(address) = &edits.address {
            form.set_address(address.as_str())?;
        }
        if let Some(postal_code) = &edits.postal_code {
            form.set_postal_code(postal_code.as_str())?;
        }
        if let Some(phone) = &edits.phone {
            form.set_phone(phone.as_str())?;
        }
        // A new country always clears the division, so it goes first.
        if let Some(country_id) = edits.country_id {
            form.on_country_changed(country_id)?;
        }
        if let Some(division_id) = edits.division_id {
            form.select_division(division_id)?;
        }

        let outcome = form.on_save().await?;
        Ok(EditReport {
            outcome,
            open_warning: form.open_warning().map(str::to_string),
            screen: form.navigator().current(),
        })
    }
}
