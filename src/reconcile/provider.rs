//! Provider reconciler and specification lookups

use npclient::{NpProvider, NullClient, ProviderPatch};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Desired attributes of a provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDesired {
    pub nrn: String,
    pub specification_slug: String,
    pub dimensions: BTreeMap<String, String>,
    pub attributes: Map<String, Value>,
}

/// What the API reports about a provider, with the specification resolved
/// back to its slug
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderObserved {
    pub id: String,
    pub nrn: String,
    pub specification_id: String,
    pub specification_slug: String,
    pub dimensions: BTreeMap<String, String>,
    pub attributes: Map<String, Value>,
}

pub struct ProviderReconciler<'a> {
    client: &'a NullClient,
}

impl<'a> ProviderReconciler<'a> {
    pub fn new(client: &'a NullClient) -> Self {
        Self { client }
    }

    /// Resolve the specification slug, then create the provider; returns the
    /// new provider id
    pub fn create(&self, desired: &ProviderDesired) -> npclient::Result<String> {
        let specification_id = self
            .client
            .specification_id_from_slug(&desired.specification_slug)?;
        log::debug!(
            "specification {} resolved to {specification_id}",
            desired.specification_slug
        );

        let created = self.client.create_provider(&NpProvider {
            id: String::new(),
            nrn: desired.nrn.clone(),
            dimensions: desired.dimensions.clone(),
            specification_id,
            attributes: desired.attributes.clone(),
        })?;
        if created.id.is_empty() {
            return Err(npclient::Error::decode(
                "creating provider resource",
                "response has no id",
            ));
        }
        log::info!("created provider {}", created.id);
        Ok(created.id)
    }

    /// Fetch the provider; `None` when it no longer exists
    pub fn read(&self, id: &str) -> npclient::Result<Option<ProviderObserved>> {
        let provider = match self.client.get_provider(id) {
            Ok(provider) => provider,
            Err(e) if e.is_not_found() => {
                log::info!("provider {id} not found");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let specification_slug = self
            .client
            .specification_slug_from_id(&provider.specification_id)?;

        Ok(Some(ProviderObserved {
            id: if provider.id.is_empty() {
                id.to_string()
            } else {
                provider.id
            },
            nrn: provider.nrn,
            specification_id: provider.specification_id,
            specification_slug,
            dimensions: provider.dimensions,
            attributes: provider.attributes,
        }))
    }

    /// Patch the attributes only; every other field is create-only
    pub fn update_attributes(
        &self,
        id: &str,
        attributes: &Map<String, Value>,
    ) -> npclient::Result<()> {
        self.client
            .patch_provider(id, &ProviderPatch { attributes })?;
        log::info!("updated provider {id}");
        Ok(())
    }

    pub fn delete(&self, id: &str) -> npclient::Result<()> {
        self.client.delete_provider(id)?;
        log::info!("deleted provider {id}");
        Ok(())
    }

    /// Look up a specification id by slug
    pub fn specification_id(&self, slug: &str) -> npclient::Result<String> {
        self.client.specification_id_from_slug(slug)
    }

    /// Look up a specification slug by id
    pub fn specification_slug(&self, id: &str) -> npclient::Result<String> {
        self.client.specification_slug_from_id(id)
    }
}
