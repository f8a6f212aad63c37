//! Building Company Repository
//!
//! Seeds a few example companies the first time the list is read.

use async_trait::async_trait;
use log::info;

use super::traits::Repository;
use super::SharedStorage;
use crate::domain::{BuildingCompany, DomainError, DomainResult, new_id};
use crate::store::AppStorage;

fn company_not_found(id: &str) -> DomainError {
    DomainError::NotFound(format!("Building company {}", id))
}

fn company(name: &str, email: &str, phone: &str, address: &str, contact: &str, notes: &str) -> BuildingCompany {
    BuildingCompany {
        id: new_id(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        address: address.to_string(),
        contact_person: contact.to_string(),
        notes: notes.to_string(),
        is_default: true,
    }
}

/// Example companies offered before the user adds their own
pub fn default_companies() -> Vec<BuildingCompany> {
    vec![
        company(
            "ABC Construction Ltd",
            "defects@abcconstruction.com",
            "+1-555-0123",
            "123 Construction Ave, City, State 12345",
            "John Smith",
            "Primary contractor for building maintenance",
        ),
        company(
            "XYZ Property Services",
            "reports@xyzproperty.com",
            "+1-555-0456",
            "456 Property St, City, State 12345",
            "Sarah Johnson",
            "Specialized in electrical and plumbing",
        ),
        company(
            "Quick Fix Solutions",
            "urgent@quickfix.com",
            "+1-555-0789",
            "789 Quick St, City, State 12345",
            "Mike Davis",
            "Emergency repairs and urgent fixes",
        ),
    ]
}

/// Stored list, seeding the defaults when it is empty
fn load_or_seed(storage: &AppStorage) -> DomainResult<Vec<BuildingCompany>> {
    let companies = storage.load_companies();
    if !companies.is_empty() {
        return Ok(companies);
    }
    let seeded = default_companies();
    storage.save_companies(&seeded)?;
    info!("Seeded {} default building companies", seeded.len());
    Ok(seeded)
}

pub struct CompanyRepository {
    storage: SharedStorage,
}

impl CompanyRepository {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    /// First company flagged as default, else the first one
    pub async fn default_company(&self) -> DomainResult<Option<BuildingCompany>> {
        let companies = self.list().await?;
        let first_default = companies.iter().position(|c| c.is_default).unwrap_or(0);
        Ok(companies.into_iter().nth(first_default))
    }

    /// Make `id` the only default
    pub async fn set_default(&self, id: &str) -> DomainResult<BuildingCompany> {
        let storage = self.storage.lock().await;
        let mut companies = load_or_seed(&storage)?;
        if !companies.iter().any(|c| c.id == id) {
            return Err(company_not_found(id));
        }
        for company in companies.iter_mut() {
            company.is_default = company.id == id;
        }
        storage.save_companies(&companies)?;
        companies
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| company_not_found(id))
    }
}

#[async_trait]
impl Repository<BuildingCompany> for CompanyRepository {
    async fn create(&self, company: &BuildingCompany) -> DomainResult<BuildingCompany> {
        let storage = self.storage.lock().await;
        let mut companies = load_or_seed(&storage)?;
        companies.push(company.clone());
        storage.save_companies(&companies)?;
        Ok(company.clone())
    }

    async fn find_by_id(&self, id: &String) -> DomainResult<Option<BuildingCompany>> {
        Ok(self.list().await?.into_iter().find(|c| &c.id == id))
    }

    async fn list(&self) -> DomainResult<Vec<BuildingCompany>> {
        let storage = self.storage.lock().await;
        load_or_seed(&storage)
    }

    async fn update(&self, company: &BuildingCompany) -> DomainResult<BuildingCompany> {
        let storage = self.storage.lock().await;
        let mut companies = load_or_seed(&storage)?;
        let slot = companies
            .iter_mut()
            .find(|c| c.id == company.id)
            .ok_or_else(|| company_not_found(&company.id))?;
        *slot = company.clone();
        storage.save_companies(&companies)?;
        Ok(company.clone())
    }

    async fn delete(&self, id: &String) -> DomainResult<()> {
        let storage = self.storage.lock().await;
        let mut companies = load_or_seed(&storage)?;
        let before = companies.len();
        companies.retain(|c| &c.id != id);
        if companies.len() == before {
            return Err(company_not_found(id));
        }
        storage.save_companies(&companies)?;
        Ok(())
    }
}
