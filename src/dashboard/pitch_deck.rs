//! Pitch deck resolution.

use crate::model::{Document, Product};

/// Picks the pitch deck the dashboard is built around.
///
/// A candidate is an approved, active product carrying an active `PITCH_DECK`
/// document; within a product the first such document wins. Among several
/// candidate products the most recently approved one wins, a missing
/// `approved_at` ranks last, and equal keys keep server order.
pub fn resolve_eligible_pitch_deck(products: &[Product]) -> Option<(&Product, &Document)> {
    products
        .iter()
        .filter(|product| product.is_eligible())
        .filter_map(|product| {
            product
                .documents
                .iter()
                .find(|doc| doc.is_active_pitch_deck())
                .map(|doc| (product, doc))
        })
        .reduce(|current, candidate| {
            if candidate.0.approved_at > current.0.approved_at {
                candidate
            } else {
                current
            }
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ids::ResourceId;
    use crate::model::{DocumentType, ProductStatus};
    use chrono::{DateTime, TimeZone, Utc};

    pub(crate) fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    pub(crate) fn pitch_deck(active: bool) -> Document {
        Document {
            id: ResourceId::new_v4(),
            title: "Deck".to_string(),
            document_type: DocumentType::PitchDeck,
            is_active: active,
            updated_at: None,
        }
    }

    pub(crate) fn other_doc() -> Document {
        Document {
            id: ResourceId::new_v4(),
            title: "Financials".to_string(),
            document_type: DocumentType::Other("FINANCIALS".to_string()),
            is_active: true,
            updated_at: None,
        }
    }

    pub(crate) fn product(
        status: ProductStatus,
        active: bool,
        approved_at: Option<DateTime<Utc>>,
        documents: Vec<Document>,
    ) -> Product {
        Product {
            id: ResourceId::new_v4(),
            name: "Acme".to_string(),
            status,
            is_active: active,
            approved_at,
            documents,
        }
    }

    #[test]
    fn empty_input_resolves_to_none() {
        assert!(resolve_eligible_pitch_deck(&[]).is_none());
    }

    #[test]
    fn ineligible_products_resolve_to_none() {
        let products = vec![
            product(ProductStatus::Submitted, true, None, vec![pitch_deck(true)]),
            product(ProductStatus::Rejected, true, None, vec![pitch_deck(true)]),
            product(ProductStatus::Approved, false, None, vec![pitch_deck(true)]),
            product(ProductStatus::Approved, true, None, vec![]),
            product(ProductStatus::Approved, true, None, vec![pitch_deck(false), other_doc()]),
        ];
        assert!(resolve_eligible_pitch_deck(&products).is_none());
    }

    #[test]
    fn first_active_pitch_deck_within_product() {
        let inactive = pitch_deck(false);
        let first = pitch_deck(true);
        let second = pitch_deck(true);
        let products = vec![product(
            ProductStatus::Approved,
            true,
            Some(at(0)),
            vec![other_doc(), inactive, first.clone(), second],
        )];
        let (_, doc) = resolve_eligible_pitch_deck(&products).unwrap();
        assert_eq!(doc.id, first.id);
    }

    #[test]
    fn most_recently_approved_product_wins() {
        let older = product(ProductStatus::Approved, true, Some(at(10)), vec![pitch_deck(true)]);
        let newer = product(ProductStatus::Approved, true, Some(at(20)), vec![pitch_deck(true)]);
        let undated = product(ProductStatus::Approved, true, None, vec![pitch_deck(true)]);
        let products = vec![undated, older, newer.clone()];

        let (chosen, _) = resolve_eligible_pitch_deck(&products).unwrap();
        assert_eq!(chosen.id, newer.id);
    }

    #[test]
    /// Ties fall back to the order the server returned.
    fn equal_approval_times_keep_server_order() {
        let a = product(ProductStatus::Approved, true, Some(at(5)), vec![pitch_deck(true)]);
        let b = product(ProductStatus::Approved, true, Some(at(5)), vec![pitch_deck(true)]);
        let products = vec![a.clone(), b];
        assert_eq!(resolve_eligible_pitch_deck(&products).unwrap().0.id, a.id);
    }

    #[test]
    fn resolution_is_idempotent() {
        let products = vec![
            product(ProductStatus::Approved, true, Some(at(1)), vec![pitch_deck(true)]),
            product(ProductStatus::Approved, true, Some(at(2)), vec![pitch_deck(true)]),
        ];
        let first = resolve_eligible_pitch_deck(&products).map(|(p, d)| (p.id, d.id));
        let second = resolve_eligible_pitch_deck(&products).map(|(p, d)| (p.id, d.id));
        assert_eq!(first, second);
    }

    #[test]
    /// Exhaustive over the eligibility flags of a single product.
    fn none_iff_no_candidate() {
        for status in [ProductStatus::Submitted, ProductStatus::Approved, ProductStatus::Rejected] {
            for active in [false, true] {
                let doc_sets = [
                    vec![],
                    vec![other_doc()],
                    vec![pitch_deck(false)],
                    vec![pitch_deck(true)],
                ];
                for docs in doc_sets {
                    let has_deck = docs.iter().any(|d| d.is_active_pitch_deck());
                    let products = vec![product(status, active, None, docs)];
                    let expected = status == ProductStatus::Approved && active && has_deck;
                    assert_eq!(resolve_eligible_pitch_deck(&products).is_some(), expected);
                }
            }
        }
    }
}
