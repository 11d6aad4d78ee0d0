use crate::core::division_filter::divisions_for_country;
use crate::core::field_validator::{validate_fields, FieldErrors, FormField, FormValues};
use crate::domain::model::{Country, CountryId, Customer, Division, DivisionId, Screen};
use crate::domain::ports::{Navigator, ReferenceDataProvider};
use crate::utils::error::{CrmError, Result};

/// Where the form is in its save cycle.
///
/// `Validating` and `Persisting` are only observable while `on_save` is running;
/// every save returns to `Editing` unless the form has navigated away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Validating,
    Persisting,
    Navigated,
}

#[derive(Debug)]
pub enum SaveOutcome {
    /// The store accepted the update and the main page is showing.
    Saved(Customer),
    /// Nothing was written; every failing field carries its message.
    Invalid(FieldErrors),
    /// The store rejected the update. The form is still open and can be saved again.
    Failed(CrmError),
}

/// Edit session for one existing customer.
pub struct CustomerEditForm<P: ReferenceDataProvider, N: Navigator> {
    provider: P,
    navigator: N,
    customer: Customer,
    countries: Vec<Country>,
    divisions: Vec<Division>,
    division_options: Vec<Division>,
    values: FormValues,
    errors: FieldErrors,
    last_error: Option<String>,
    open_warning: Option<String>,
    state: FormState,
}

impl<P: ReferenceDataProvider, N: Navigator> CustomerEditForm<P, N> {
    /// Fetches the reference lists and opens the form. A failed read aborts the open.
    pub async fn load(provider: P, navigator: N, customer: Customer) -> Result<Self> {
        let countries = provider.list_countries().await?;
        let divisions = provider.list_divisions().await?;
        tracing::debug!(
            "Loaded {} countries and {} divisions",
            countries.len(),
            divisions.len()
        );
        Ok(Self::open(provider, navigator, customer, countries, divisions))
    }

    pub fn open(
        provider: P,
        navigator: N,
        customer: Customer,
        countries: Vec<Country>,
        divisions: Vec<Division>,
    ) -> Self {
        let mut open_warning = None;

        let division = divisions
            .iter()
            .find(|d| d.id == customer.division_id)
            .cloned();
        let country = division
            .as_ref()
            .and_then(|d| countries.iter().find(|c| c.id == d.country_id))
            .cloned();

        match (&division, &country) {
            (None, _) => {
                open_warning = Some(format!(
                    "Customer {} references unknown division {}; choose a country and State/Province",
                    customer.id, customer.division_id
                ));
            }
            (Some(d), None) => {
                open_warning = Some(format!(
                    "Division {} references unknown country {}; choose a country and State/Province",
                    d.id, d.country_id
                ));
            }
            _ => {}
        }
        if let Some(warning) = &open_warning {
            tracing::warn!("{}", warning);
        }

        // The division only stays selected when its country could be resolved too,
        // so the candidate list always matches the selected country.
        let (country_id, division_id) = match (&division, &country) {
            (Some(d), Some(c)) => (Some(c.id), Some(d.id)),
            _ => (None, None),
        };
        let division_options = match country_id {
            Some(id) => divisions_for_country(&divisions, id),
            None => divisions.clone(),
        };

        let values = FormValues {
            name: customer.name.clone(),
            address: customer.address.clone(),
            postal_code: customer.postal_code.clone(),
            phone: customer.phone.clone(),
            country: country_id,
            division: division_id,
        };

        tracing::info!("Opened customer {} for editing", customer.id);

        Self {
            provider,
            navigator,
            customer,
            countries,
            divisions,
            division_options,
            values,
            errors: FieldErrors::default(),
            last_error: None,
            open_warning,
            state: FormState::Editing,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != FormState::Navigated
    }

    /// The customer as last written by `on_save`. Untouched until the first save attempt.
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn country_options(&self) -> &[Country] {
        &self.countries
    }

    pub fn division_options(&self) -> &[Division] {
        &self.division_options
    }

    pub fn selected_country(&self) -> Option<&Country> {
        let id = self.values.country?;
        self.countries.iter().find(|c| c.id == id)
    }

    pub fn selected_division(&self) -> Option<&Division> {
        let id = self.values.division?;
        self.division_options.iter().find(|d| d.id == id)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error_for(&self, field: FormField) -> Option<&'static str> {
        self.errors.get(field)
    }

    /// Message from the last failed store update, cleared by the next save attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn open_warning(&self) -> Option<&str> {
        self.open_warning.as_deref()
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(CrmError::FormClosed)
        }
    }

    pub fn set_name(&mut self, value: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        self.values.name = value.into();
        Ok(())
    }

    pub fn set_address(&mut self, value: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        self.values.address = value.into();
        Ok(())
    }

    pub fn set_postal_code(&mut self, value: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        self.values.postal_code = value.into();
        Ok(())
    }

    pub fn set_phone(&mut self, value: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        self.values.phone = value.into();
        Ok(())
    }

    /// Narrows the division choices to `country_id` and drops the division selection.
    /// Choosing the country that is already selected changes nothing.
    pub fn on_country_changed(&mut self, country_id: CountryId) -> Result<()> {
        self.ensure_open()?;
        if !self.countries.iter().any(|c| c.id == country_id) {
            return Err(CrmError::validation(format!(
                "Country {} is not one of the available countries",
                country_id
            )));
        }

        if self.values.country == Some(country_id) {
            return Ok(());
        }

        self.values.country = Some(country_id);
        self.values.division = None;
        self.division_options = divisions_for_country(&self.divisions, country_id);

        tracing::debug!(
            "Country {} selected, {} divisions available",
            country_id,
            self.division_options.len()
        );
        Ok(())
    }

    pub fn select_division(&mut self, division_id: DivisionId) -> Result<()> {
        self.ensure_open()?;
        if !self.division_options.iter().any(|d| d.id == division_id) {
            return Err(CrmError::validation(format!(
                "Division {} is not available for the selected country",
                division_id
            )));
        }
        self.values.division = Some(division_id);
        Ok(())
    }

    pub fn clear_country(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.values.country = None;
        self.values.division = None;
        self.division_options = self.divisions.clone();
        Ok(())
    }

    pub fn clear_division(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.values.division = None;
        Ok(())
    }

    pub async fn on_save(&mut self) -> Result<SaveOutcome> {
        self.ensure_open()?;

        self.state = FormState::Validating;
        self.last_error = None;
        self.errors = validate_fields(&self.values);

        let Some(division_id) = self.values.division.filter(|_| self.errors.is_empty()) else {
            self.state = FormState::Editing;
            tracing::info!(
                "Customer {} not saved, {} field(s) invalid: {}",
                self.customer.id,
                self.errors.len(),
                self.errors
            );
            return Ok(SaveOutcome::Invalid(self.errors.clone()));
        };

        self.customer.name = self.values.name.clone();
        self.customer.address = self.values.address.clone();
        self.customer.postal_code = self.values.postal_code.clone();
        self.customer.phone = self.values.phone.clone();
        self.customer.division_id = division_id;

        self.state = FormState::Persisting;
        match self.provider.update_customer(&self.customer).await {
            Ok(saved) => {
                tracing::info!("Customer {} updated", saved.id);
                self.customer = saved;
                self.state = FormState::Navigated;
                self.navigator.go_to(Screen::MainPage);
                Ok(SaveOutcome::Saved(self.customer.clone()))
            }
            Err(e) => {
                tracing::warn!(
                    "Updating customer {} failed (retryable: {}): {}",
                    self.customer.id,
                    e.is_retryable(),
                    e
                );
                self.last_error = Some(e.user_friendly_message());
                self.state = FormState::Editing;
                Ok(SaveOutcome::Failed(e))
            }
        }
    }

    /// Leaves without saving. Edits only ever reach the customer inside `on_save`.
    pub fn on_cancel(&mut self) -> Result<()> {
        self.ensure_open()?;
        tracing::info!("Editing of customer {} cancelled", self.customer.id);
        self.state = FormState::Navigated;
        self.navigator.go_to(Screen::MainPage);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::navigator::ScreenLog;
    use crate::domain::model::CustomerId;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockProvider {
        updates: Arc<Mutex<Vec<Customer>>>,
        fail_updates: bool,
        fail_reads: bool,
    }

    impl MockProvider {
        fn failing_updates() -> Self {
            Self {
                fail_updates: true,
                ..Self::default()
            }
        }

        async fn updates(&self) -> Vec<Customer> {
            self.updates.lock().await.clone()
        }
    }

    #[async_trait]
    impl ReferenceDataProvider for MockProvider {
        async fn list_countries(&self) -> Result<Vec<Country>> {
            if self.fail_reads {
                return Err(CrmError::data_access("list_countries", "connection refused"));
            }
            Ok(countries())
        }

        async fn list_divisions(&self) -> Result<Vec<Division>> {
            Ok(divisions())
        }

        async fn fetch_customer(&self, id: CustomerId) -> Result<Customer> {
            Err(CrmError::not_found("Customer", id))
        }

        async fn update_customer(&self, customer: &Customer) -> Result<Customer> {
            self.updates.lock().await.push(customer.clone());
            if self.fail_updates {
                return Err(CrmError::data_access("update_customer", "connection reset"));
            }
            Ok(customer.clone())
        }
    }

    fn countries() -> Vec<Country> {
        vec![
            Country {
                id: CountryId(2),
                name: "UK".to_string(),
            },
            Country {
                id: CountryId(5),
                name: "Canada".to_string(),
            },
        ]
    }

    fn divisions() -> Vec<Division> {
        vec![
            Division {
                id: DivisionId(33),
                name: "England".to_string(),
                country_id: CountryId(2),
            },
            Division {
                id: DivisionId(50),
                name: "Alberta".to_string(),
                country_id: CountryId(5),
            },
            Division {
                id: DivisionId(34),
                name: "Wales".to_string(),
                country_id: CountryId(2),
            },
            Division {
                id: DivisionId(51),
                name: "Ontario".to_string(),
                country_id: CountryId(5),
            },
        ]
    }

    fn customer(division: i32) -> Customer {
        Customer {
            id: CustomerId(7),
            name: "Lady McAnderson".to_string(),
            address: "2 Wonder Way".to_string(),
            postal_code: "AF19B".to_string(),
            phone: "01-555-555".to_string(),
            division_id: DivisionId(division),
            last_update: None,
            last_updated_by: None,
        }
    }

    fn open_form(
        provider: MockProvider,
        division: i32,
    ) -> CustomerEditForm<MockProvider, ScreenLog> {
        CustomerEditForm::open(
            provider,
            ScreenLog::new(),
            customer(division),
            countries(),
            divisions(),
        )
    }

    #[test]
    fn test_open_preselects_division_and_derived_country() {
        let form = open_form(MockProvider::default(), 33);

        assert_eq!(form.values().division, Some(DivisionId(33)));
        assert_eq!(form.values().country, Some(CountryId(2)));
        assert_eq!(form.selected_country().map(|c| c.name.as_str()), Some("UK"));
        assert_eq!(form.values().name, "Lady McAnderson");
        assert_eq!(form.values().postal_code, "AF19B");
        assert!(form.open_warning().is_none());
        assert_eq!(form.state(), FormState::Editing);

        let options: Vec<i32> = form.division_options().iter().map(|d| d.id.0).collect();
        assert_eq!(options, vec![33, 34]);
    }

    #[test]
    fn test_open_with_unknown_division_leaves_selectors_unset() {
        let form = open_form(MockProvider::default(), 999);

        assert_eq!(form.values().division, None);
        assert_eq!(form.values().country, None);
        assert_eq!(form.division_options().len(), 4);
        assert!(form.open_warning().unwrap().contains("999"));
    }

    #[test]
    fn test_open_keeps_text_verbatim() {
        let mut c = customer(33);
        c.name = "  padded  ".to_string();
        let form = CustomerEditForm::open(
            MockProvider::default(),
            ScreenLog::new(),
            c,
            countries(),
            divisions(),
        );
        assert_eq!(form.values().name, "  padded  ");
    }

    #[test]
    fn test_country_change_filters_and_clears_division() {
        let mut form = open_form(MockProvider::default(), 33);

        form.on_country_changed(CountryId(5)).unwrap();

        let options: Vec<i32> = form.division_options().iter().map(|d| d.id.0).collect();
        assert_eq!(options, vec![50, 51]);
        assert_eq!(form.values().division, None);
        assert!(form.selected_division().is_none());
    }

    #[test]
    fn test_open_with_division_of_unknown_country_leaves_selectors_unset() {
        let countries = vec![Country {
            id: CountryId(1),
            name: "U.S".to_string(),
        }];
        let divisions = vec![Division {
            id: DivisionId(33),
            name: "England".to_string(),
            country_id: CountryId(2),
        }];

        let form = CustomerEditForm::open(
            MockProvider::default(),
            ScreenLog::new(),
            customer(33),
            countries,
            divisions.clone(),
        );

        assert_eq!(form.values().country, None);
        assert_eq!(form.values().division, None);
        assert!(form.selected_division().is_none());
        let warning = form.open_warning().unwrap();
        assert!(warning.contains("unknown country 2"), "{}", warning);
        assert_eq!(form.division_options(), divisions.as_slice());
    }

    #[test]
    fn test_reselecting_same_country_keeps_division() {
        let mut form = open_form(MockProvider::default(), 33);

        form.on_country_changed(CountryId(2)).unwrap();

        assert_eq!(form.values().division, Some(DivisionId(33)));
        let options: Vec<i32> = form.division_options().iter().map(|d| d.id.0).collect();
        assert_eq!(options, vec![33, 34]);

        form.on_country_changed(CountryId(5)).unwrap();
        form.on_country_changed(CountryId(2)).unwrap();
        assert_eq!(form.values().division, None);
    }

    #[test]
    fn test_unknown_country_is_rejected() {
        let mut form = open_form(MockProvider::default(), 33);

        let err = form.on_country_changed(CountryId(77)).unwrap_err();

        assert!(matches!(err, CrmError::ValidationError { .. }));
        assert_eq!(form.values().division, Some(DivisionId(33)));
    }

    #[test]
    fn test_division_outside_country_is_rejected() {
        let mut form = open_form(MockProvider::default(), 33);

        assert!(form.select_division(DivisionId(50)).is_err());
        form.select_division(DivisionId(34)).unwrap();
        assert_eq!(form.values().division, Some(DivisionId(34)));
    }

    #[test]
    fn test_clear_country_restores_full_division_list() {
        let mut form = open_form(MockProvider::default(), 33);
        form.clear_country().unwrap();
        assert_eq!(form.division_options().len(), 4);
        assert_eq!(form.values().division, None);
    }

    #[tokio::test]
    async fn test_save_valid_form_updates_once_and_navigates() {
        let provider = MockProvider::default();
        let mut form = open_form(provider.clone(), 33);
        form.set_name("Lady Anderson").unwrap();
        form.on_country_changed(CountryId(5)).unwrap();
        form.select_division(DivisionId(51)).unwrap();

        let outcome = form.on_save().await.unwrap();

        let saved = match outcome {
            SaveOutcome::Saved(c) => c,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(saved.name, "Lady Anderson");
        assert_eq!(saved.division_id, DivisionId(51));

        let updates = provider.updates().await;
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].name, "Lady Anderson");
        assert_eq!(updates[0].address, "2 Wonder Way");

        assert_eq!(form.state(), FormState::Navigated);
        assert_eq!(form.navigator().history(), &[Screen::MainPage]);
    }

    #[tokio::test]
    async fn test_save_with_empty_name_does_not_write() {
        let provider = MockProvider::default();
        let mut form = open_form(provider.clone(), 33);
        form.set_name("").unwrap();

        let outcome = form.on_save().await.unwrap();

        assert!(matches!(outcome, SaveOutcome::Invalid(_)));
        assert_eq!(form.error_for(FormField::Name), Some("Name is required"));
        assert_eq!(form.errors().len(), 1);
        assert!(provider.updates().await.is_empty());
        assert!(form.navigator().history().is_empty());
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(form.customer().name, "Lady McAnderson");
    }

    #[tokio::test]
    async fn test_save_after_country_change_requires_division() {
        let provider = MockProvider::default();
        let mut form = open_form(provider.clone(), 33);
        form.on_country_changed(CountryId(5)).unwrap();

        let outcome = form.on_save().await.unwrap();

        match outcome {
            SaveOutcome::Invalid(errors) => {
                assert_eq!(errors.get(FormField::Division), Some("State/Province is required"));
                assert_eq!(errors.len(), 1);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(provider.updates().await.is_empty());
    }

    #[tokio::test]
    async fn test_errors_are_recomputed_on_each_save() {
        let mut form = open_form(MockProvider::default(), 33);
        form.set_name(" ").unwrap();
        form.set_phone("").unwrap();
        form.on_save().await.unwrap();
        assert_eq!(form.errors().len(), 2);

        form.set_name("Fixed").unwrap();
        form.on_save().await.unwrap();
        assert!(!form.errors().contains(FormField::Name));
        assert!(form.errors().contains(FormField::Phone));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_form_open_with_entered_values() {
        let provider = MockProvider::failing_updates();
        let mut form = open_form(provider.clone(), 33);
        form.set_address("10 New Street").unwrap();

        let outcome = form.on_save().await.unwrap();

        match outcome {
            SaveOutcome::Failed(e) => assert!(e.is_retryable()),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(form.is_open());
        assert_eq!(form.state(), FormState::Editing);
        assert!(form.last_error().is_some());
        assert_eq!(form.values().address, "10 New Street");
        assert_eq!(form.customer().address, "10 New Street");
        assert!(form.navigator().history().is_empty());
        assert_eq!(provider.updates().await.len(), 1);

        // retry is allowed
        let retry = form.on_save().await.unwrap();
        assert!(matches!(retry, SaveOutcome::Failed(_)));
        assert_eq!(provider.updates().await.len(), 2);
    }

    #[tokio::test]
    async fn test_cancel_navigates_without_update() {
        let provider = MockProvider::default();
        let mut form = open_form(provider.clone(), 33);
        form.set_name("Ignored").unwrap();

        form.on_cancel().unwrap();

        assert_eq!(form.navigator().current(), Some(Screen::MainPage));
        assert!(provider.updates().await.is_empty());
        assert_eq!(form.customer().name, "Lady McAnderson");
    }

    #[tokio::test]
    async fn test_closed_form_rejects_further_events() {
        let mut form = open_form(MockProvider::default(), 33);
        form.on_cancel().unwrap();

        assert!(matches!(form.on_save().await, Err(CrmError::FormClosed)));
        assert!(matches!(form.on_cancel(), Err(CrmError::FormClosed)));
        assert!(matches!(form.set_name("x"), Err(CrmError::FormClosed)));
        assert_eq!(form.navigator().history().len(), 1);
    }

    #[tokio::test]
    async fn test_load_surfaces_read_failure() {
        let provider = MockProvider {
            fail_reads: true,
            ..MockProvider::default()
        };

        let result = CustomerEditForm::load(provider, ScreenLog::new(), customer(33)).await;

        assert!(matches!(result, Err(CrmError::DataAccessError { .. })));
    }

    #[tokio::test]
    async fn test_load_populates_from_provider() {
        let form = CustomerEditForm::load(MockProvider::default(), ScreenLog::new(), customer(50))
            .await
            .unwrap();

        assert_eq!(form.values().country, Some(CountryId(5)));
        assert_eq!(form.country_options().len(), 2);
    }
}
