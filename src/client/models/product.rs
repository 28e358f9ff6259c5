//! Product models

use serde::{Deserialize, Serialize};

/// Product master data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub cod_pro: i64,

    /// Internal reference
    #[serde(default)]
    pub refint: Option<String>,

    /// External reference
    #[serde(default)]
    pub ref_ext: Option<String>,

    #[serde(default)]
    pub famille: Option<i64>,

    #[serde(default)]
    pub s_famille: Option<i64>,

    /// Quality tier (OE, OEM, PMQ, PMV)
    #[serde(default)]
    pub qualite: Option<String>,

    /// Status code (0 RAS, 1 purchase forbidden, 2 sale forbidden, 8 both)
    #[serde(default)]
    pub statut: Option<i64>,

    /// Main supplier code
    #[serde(default)]
    pub cod_fou_principal: Option<i64>,

    /// Main supplier name
    #[serde(default)]
    pub nom_fou: Option<String>,
}

/// `POST /products/details` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDetailList {
    #[serde(default)]
    pub products: Vec<ProductDetail>,
}

/// Link between a product and a manufacturer or external reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductMatch {
    pub cod_pro: i64,

    #[serde(default)]
    pub ref_crn: Option<String>,

    #[serde(default)]
    pub ref_ext: Option<String>,
}

/// `POST /products/match` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductMatchList {
    #[serde(default)]
    pub matches: Vec<ProductMatch>,
}

/// `POST /products/matrix` response: flat lists for one CRN group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductMatrix {
    #[serde(default)]
    pub groupe_crn: Option<i64>,

    #[serde(default)]
    pub cod_pro_list: Vec<i64>,

    #[serde(default)]
    pub ref_crn_list: Vec<String>,

    #[serde(default)]
    pub ref_ext_list: Vec<String>,
}

/// Purchase price of one product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchasePrice {
    pub cod_pro: i64,

    /// Price in euros; absent when never purchased
    #[serde(default)]
    pub px_achat_eur: Option<f64>,
}

/// `POST /purchase/price` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchasePriceList {
    #[serde(default)]
    pub items: Vec<PurchasePrice>,
}

/// `POST /identifiers/resolve-codpro` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodProList {
    #[serde(default)]
    pub cod_pro_list: Vec<i64>,
}
