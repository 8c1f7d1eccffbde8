//! Derived transformation URLs.
//!
//! A derived link asks the remote asset host to apply a transformation (blur,
//! quality reduction) on the fly when the URL is fetched. Building one is pure
//! string templating against the host's delivery scheme:
//!
//! `https://res.cloudinary.com/<cloud>/image/upload/<params>/<resource>`
//!
//! where `<params>` is the comma-joined parameter list in fixed order —
//! effect first, then quality. No network call happens here.

use url::Url;

use crate::publish::PublishedLink;

const DELIVERY_HOST: &str = "https://res.cloudinary.com";

/// Asset-host account the derived URLs are templated against
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Account/bucket namespace at the delivery host
    pub cloud_name: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            cloud_name: "dogjmmett".to_string(),
        }
    }
}

/// Transformation parameters, serialized in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transformations {
    /// Named effect with its argument, e.g. `blur:10`
    pub effect: Option<String>,
    /// Delivery quality (1..=100)
    pub quality: Option<u32>,
}

impl Transformations {
    fn to_segment(&self) -> Option<String> {
        let mut params = Vec::new();
        if let Some(effect) = &self.effect {
            params.push(format!("e_{}", effect));
        }
        if let Some(quality) = self.quality {
            params.push(format!("q_{}", quality));
        }
        if params.is_empty() {
            None
        } else {
            Some(params.join(","))
        }
    }
}

/// A URL that applies `Transformations` to a published resource when fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedLink {
    pub url: String,
}

/// Build a delivery URL for a resource id against the asset host.
///
/// Pure and deterministic: equal inputs always produce equal output, and the
/// parameter order in the URL is fixed (effect, then quality).
pub fn build_url(resource_id: &str, cloud: &CloudConfig, transformations: &Transformations) -> String {
    match transformations.to_segment() {
        Some(params) => format!(
            "{}/{}/image/upload/{}/{}",
            DELIVERY_HOST, cloud.cloud_name, params, resource_id
        ),
        None => format!("{}/{}/image/upload/{}", DELIVERY_HOST, cloud.cloud_name, resource_id),
    }
}

/// Derive a transformed link from a published one.
///
/// The resource id is the final path segment of the published URL; input that
/// does not parse as a URL is used whole.
pub fn derive_transformed_link(
    link: &PublishedLink,
    cloud: &CloudConfig,
    transformations: &Transformations,
) -> DerivedLink {
    let resource_id = resource_id_of(&link.url);
    DerivedLink {
        url: build_url(&resource_id, cloud, transformations),
    }
}

fn resource_id_of(link: &str) -> String {
    let Ok(parsed) = Url::parse(link) else {
        return link.to_string();
    };
    match parsed.path_segments().and_then(|segments| segments.last()) {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => link.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blur10() -> Transformations {
        Transformations {
            effect: Some("blur:10".to_string()),
            quality: Some(1),
        }
    }

    #[test]
    fn build_url_orders_parameters() {
        let url = build_url("img123.png", &CloudConfig::default(), &blur10());
        assert_eq!(
            url,
            "https://res.cloudinary.com/dogjmmett/image/upload/e_blur:10,q_1/img123.png"
        );
    }

    #[test]
    fn build_url_without_transformations_omits_segment() {
        let url = build_url("img123.png", &CloudConfig::default(), &Transformations::default());
        assert_eq!(url, "https://res.cloudinary.com/dogjmmett/image/upload/img123.png");
    }

    #[test]
    fn derive_is_deterministic() {
        let link = PublishedLink { url: "https://host/img123.png".to_string() };
        let a = derive_transformed_link(&link, &CloudConfig::default(), &blur10());
        let b = derive_transformed_link(&link, &CloudConfig::default(), &blur10());
        assert_eq!(a, b);
        assert!(a.url.contains("img123.png"));
        assert!(a.url.contains("e_blur:10,q_1"));
    }

    #[test]
    fn changing_link_changes_only_resource_segment() {
        let cloud = CloudConfig::default();
        let a = derive_transformed_link(
            &PublishedLink { url: "https://host/img123.png".to_string() },
            &cloud,
            &blur10(),
        );
        let b = derive_transformed_link(
            &PublishedLink { url: "https://host/img456.png".to_string() },
            &cloud,
            &blur10(),
        );
        assert_ne!(a, b);
        let prefix_a = a.url.strip_suffix("img123.png").unwrap();
        let prefix_b = b.url.strip_suffix("img456.png").unwrap();
        assert_eq!(prefix_a, prefix_b);
    }

    #[test]
    fn unparseable_link_is_used_whole() {
        let link = PublishedLink { url: "not a url".to_string() };
        let derived = derive_transformed_link(&link, &CloudConfig::default(), &blur10());
        assert!(derived.url.ends_with("/not a url"));
    }
}
