//! Component blocks and their variant resolution.
//!
//! Upstream models a block as an object with one optional field per possible
//! component, exactly one of which is meant to be populated. Each block type
//! resolves to a typed variant: the first populated slot in declaration
//! order, or `Unknown` when none is. Several populated slots are not an
//! error; the earlier slot wins.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::Image;
use crate::components::{
    AccordionGroup, ApiComponent, CardCollection, DynamicComponent, PgpCardCollection, QuickLinks,
    ShippingPromoBanner, Teaser, Text, TextAndImageCarousel,
};

// ---------------------------------------------------------------------------
// Shared resolution
// ---------------------------------------------------------------------------

/// A resolved block variant.
pub trait VariantInfo {
    /// Stable snake_case name of the populated slot (`"unknown"` if none).
    fn kind_name(&self) -> &'static str;

    fn is_unknown(&self) -> bool;
}

/// A block type with a closed set of component slots.
pub trait BlockUnion {
    type Variant<'a>: VariantInfo
    where
        Self: 'a;

    fn variant(&self) -> Self::Variant<'_>;
}

/// Resolved variants of `blocks` in order, without the unknown ones.
pub fn renderable<B: BlockUnion>(blocks: &[B]) -> Vec<B::Variant<'_>> {
    blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| {
            let variant = block.variant();
            if variant.is_unknown() {
                debug!(index, "skipping block with no known component");
                None
            } else {
                Some(variant)
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Page blocks
// ---------------------------------------------------------------------------

/// One entry of a page's `components` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_component: Option<ApiComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teaser: Option<Teaser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_and_image_carousel: Option<TextAndImageCarousel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Text>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_collection: Option<CardCollection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pgp_collection: Option<PgpCardCollection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_links: Option<QuickLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_preset: Option<Image>,
}

/// Slot names of [`PageBlock`], in resolution priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    ApiComponent,
    Teaser,
    TextAndImageCarousel,
    Text,
    CardCollection,
    PgpCollection,
    QuickLinks,
    ImagePreset,
    Unknown,
}

impl BlockKind {
    /// Every real slot, highest priority first.
    pub const SLOTS: [BlockKind; 8] = [
        BlockKind::ApiComponent,
        BlockKind::Teaser,
        BlockKind::TextAndImageCarousel,
        BlockKind::Text,
        BlockKind::CardCollection,
        BlockKind::PgpCollection,
        BlockKind::QuickLinks,
        BlockKind::ImagePreset,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            BlockKind::ApiComponent => "api_component",
            BlockKind::Teaser => "teaser",
            BlockKind::TextAndImageCarousel => "text_and_image_carousel",
            BlockKind::Text => "text",
            BlockKind::CardCollection => "card_collection",
            BlockKind::PgpCollection => "pgp_collection",
            BlockKind::QuickLinks => "quick_links",
            BlockKind::ImagePreset => "image_preset",
            BlockKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed view of the component a [`PageBlock`] carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockVariant<'a> {
    ApiComponent(&'a ApiComponent),
    Teaser(&'a Teaser),
    TextAndImageCarousel(&'a TextAndImageCarousel),
    Text(&'a Text),
    CardCollection(&'a CardCollection),
    PgpCollection(&'a PgpCardCollection),
    QuickLinks(&'a QuickLinks),
    ImagePreset(&'a Image),
    Unknown,
}

impl BlockVariant<'_> {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockVariant::ApiComponent(_) => BlockKind::ApiComponent,
            BlockVariant::Teaser(_) => BlockKind::Teaser,
            BlockVariant::TextAndImageCarousel(_) => BlockKind::TextAndImageCarousel,
            BlockVariant::Text(_) => BlockKind::Text,
            BlockVariant::CardCollection(_) => BlockKind::CardCollection,
            BlockVariant::PgpCollection(_) => BlockKind::PgpCollection,
            BlockVariant::QuickLinks(_) => BlockKind::QuickLinks,
            BlockVariant::ImagePreset(_) => BlockKind::ImagePreset,
            BlockVariant::Unknown => BlockKind::Unknown,
        }
    }
}

impl VariantInfo for BlockVariant<'_> {
    fn kind_name(&self) -> &'static str {
        self.kind().as_str()
    }

    fn is_unknown(&self) -> bool {
        matches!(self, BlockVariant::Unknown)
    }
}

impl PageBlock {
    /// The component in `kind`'s slot, if populated.
    pub fn slot(&self, kind: BlockKind) -> Option<BlockVariant<'_>> {
        match kind {
            BlockKind::ApiComponent => self.api_component.as_ref().map(BlockVariant::ApiComponent),
            BlockKind::Teaser => self.teaser.as_ref().map(BlockVariant::Teaser),
            BlockKind::TextAndImageCarousel => self
                .text_and_image_carousel
                .as_ref()
                .map(BlockVariant::TextAndImageCarousel),
            BlockKind::Text => self.text.as_ref().map(BlockVariant::Text),
            BlockKind::CardCollection => {
                self.card_collection.as_ref().map(BlockVariant::CardCollection)
            }
            BlockKind::PgpCollection => {
                self.pgp_collection.as_ref().map(BlockVariant::PgpCollection)
            }
            BlockKind::QuickLinks => self.quick_links.as_ref().map(BlockVariant::QuickLinks),
            BlockKind::ImagePreset => self.image_preset.as_ref().map(BlockVariant::ImagePreset),
            BlockKind::Unknown => None,
        }
    }

    /// First populated slot in priority order, else [`BlockVariant::Unknown`].
    pub fn variant(&self) -> BlockVariant<'_> {
        BlockKind::SLOTS
            .into_iter()
            .find_map(|kind| self.slot(kind))
            .unwrap_or(BlockVariant::Unknown)
    }

    /// Every populated slot; more than one means upstream sent a malformed block.
    pub fn populated_slots(&self) -> Vec<BlockKind> {
        BlockKind::SLOTS
            .into_iter()
            .filter(|kind| self.slot(*kind).is_some())
            .collect()
    }
}

impl BlockUnion for PageBlock {
    type Variant<'a> = BlockVariant<'a>;

    fn variant(&self) -> BlockVariant<'_> {
        PageBlock::variant(self)
    }
}

// ---------------------------------------------------------------------------
// PDP blocks
// ---------------------------------------------------------------------------

/// One entry of a product page's `details` or `marketing` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdpPageBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_link: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_title: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_summary: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_link: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_variant: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_bundle: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_selection: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_selection: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_sell_panel: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_action: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personalized_list: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_assurance: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_options: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_promo_banner: Option<ShippingPromoBanner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accordion_group: Option<AccordionGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_inspiration: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequently_bought: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_similar: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<DynamicComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_links: Option<QuickLinks>,
}

/// Slot names of [`PdpPageBlock`], in resolution priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PdpSlot {
    BrandLink,
    ProductTitle,
    RatingSummary,
    CurrentPrice,
    PromotionLink,
    ColorVariant,
    InlineBundle,
    SizeSelection,
    LengthSelection,
    CrossSellPanel,
    PurchaseAction,
    PersonalizedList,
    Payment,
    TrustAssurance,
    FulfillmentOptions,
    ShippingPromoBanner,
    AccordionGroup,
    StyleInspiration,
    FrequentlyBought,
    ShopSimilar,
    Reviews,
    QuickLinks,
}

impl PdpSlot {
    pub const ALL: [PdpSlot; 22] = [
        PdpSlot::BrandLink,
        PdpSlot::ProductTitle,
        PdpSlot::RatingSummary,
        PdpSlot::CurrentPrice,
        PdpSlot::PromotionLink,
        PdpSlot::ColorVariant,
        PdpSlot::InlineBundle,
        PdpSlot::SizeSelection,
        PdpSlot::LengthSelection,
        PdpSlot::CrossSellPanel,
        PdpSlot::PurchaseAction,
        PdpSlot::PersonalizedList,
        PdpSlot::Payment,
        PdpSlot::TrustAssurance,
        PdpSlot::FulfillmentOptions,
        PdpSlot::ShippingPromoBanner,
        PdpSlot::AccordionGroup,
        PdpSlot::StyleInspiration,
        PdpSlot::FrequentlyBought,
        PdpSlot::ShopSimilar,
        PdpSlot::Reviews,
        PdpSlot::QuickLinks,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PdpSlot::BrandLink => "brand_link",
            PdpSlot::ProductTitle => "product_title",
            PdpSlot::RatingSummary => "rating_summary",
            PdpSlot::CurrentPrice => "current_price",
            PdpSlot::PromotionLink => "promotion_link",
            PdpSlot::ColorVariant => "color_variant",
            PdpSlot::InlineBundle => "inline_bundle",
            PdpSlot::SizeSelection => "size_selection",
            PdpSlot::LengthSelection => "length_selection",
            PdpSlot::CrossSellPanel => "cross_sell_panel",
            PdpSlot::PurchaseAction => "purchase_action",
            PdpSlot::PersonalizedList => "personalized_list",
            PdpSlot::Payment => "payment",
            PdpSlot::TrustAssurance => "trust_assurance",
            PdpSlot::FulfillmentOptions => "fulfillment_options",
            PdpSlot::ShippingPromoBanner => "shipping_promo_banner",
            PdpSlot::AccordionGroup => "accordion_group",
            PdpSlot::StyleInspiration => "style_inspiration",
            PdpSlot::FrequentlyBought => "frequently_bought",
            PdpSlot::ShopSimilar => "shop_similar",
            PdpSlot::Reviews => "reviews",
            PdpSlot::QuickLinks => "quick_links",
        }
    }
}

impl fmt::Display for PdpSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed view of the component a [`PdpPageBlock`] carries.
///
/// Most PDP slots are frontend-rendered placeholders sharing one payload
/// shape, so they collapse into [`PdpVariant::Dynamic`] tagged with the slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PdpVariant<'a> {
    Dynamic(PdpSlot, &'a DynamicComponent),
    ShippingPromoBanner(&'a ShippingPromoBanner),
    AccordionGroup(&'a AccordionGroup),
    QuickLinks(&'a QuickLinks),
    Unknown,
}

impl PdpVariant<'_> {
    pub fn slot(&self) -> Option<PdpSlot> {
        match self {
            PdpVariant::Dynamic(slot, _) => Some(*slot),
            PdpVariant::ShippingPromoBanner(_) => Some(PdpSlot::ShippingPromoBanner),
            PdpVariant::AccordionGroup(_) => Some(PdpSlot::AccordionGroup),
            PdpVariant::QuickLinks(_) => Some(PdpSlot::QuickLinks),
            PdpVariant::Unknown => None,
        }
    }
}

impl VariantInfo for PdpVariant<'_> {
    fn kind_name(&self) -> &'static str {
        self.slot().map_or("unknown", PdpSlot::as_str)
    }

    fn is_unknown(&self) -> bool {
        matches!(self, PdpVariant::Unknown)
    }
}

impl PdpPageBlock {
    pub fn slot(&self, slot: PdpSlot) -> Option<PdpVariant<'_>> {
        let found = match slot {
            PdpSlot::BrandLink => self.brand_link.as_ref(),
            PdpSlot::ProductTitle => self.product_title.as_ref(),
            PdpSlot::RatingSummary => self.rating_summary.as_ref(),
            PdpSlot::CurrentPrice => self.current_price.as_ref(),
            PdpSlot::PromotionLink => self.promotion_link.as_ref(),
            PdpSlot::ColorVariant => self.color_variant.as_ref(),
            PdpSlot::InlineBundle => self.inline_bundle.as_ref(),
            PdpSlot::SizeSelection => self.size_selection.as_ref(),
            PdpSlot::LengthSelection => self.length_selection.as_ref(),
            PdpSlot::CrossSellPanel => self.cross_sell_panel.as_ref(),
            PdpSlot::PurchaseAction => self.purchase_action.as_ref(),
            PdpSlot::PersonalizedList => self.personalized_list.as_ref(),
            PdpSlot::Payment => self.payment.as_ref(),
            PdpSlot::TrustAssurance => self.trust_assurance.as_ref(),
            PdpSlot::FulfillmentOptions => self.fulfillment_options.as_ref(),
            PdpSlot::StyleInspiration => self.style_inspiration.as_ref(),
            PdpSlot::FrequentlyBought => self.frequently_bought.as_ref(),
            PdpSlot::ShopSimilar => self.shop_similar.as_ref(),
            PdpSlot::Reviews => self.reviews.as_ref(),
            PdpSlot::ShippingPromoBanner => {
                return self
                    .shipping_promo_banner
                    .as_ref()
                    .map(PdpVariant::ShippingPromoBanner);
            }
            PdpSlot::AccordionGroup => {
                return self.accordion_group.as_ref().map(PdpVariant::AccordionGroup);
            }
            PdpSlot::QuickLinks => return self.quick_links.as_ref().map(PdpVariant::QuickLinks),
        };
        found.map(|component| PdpVariant::Dynamic(slot, component))
    }

    /// First populated slot in priority order, else [`PdpVariant::Unknown`].
    pub fn variant(&self) -> PdpVariant<'_> {
        PdpSlot::ALL
            .into_iter()
            .find_map(|slot| self.slot(slot))
            .unwrap_or(PdpVariant::Unknown)
    }

    pub fn populated_slots(&self) -> Vec<PdpSlot> {
        PdpSlot::ALL
            .into_iter()
            .filter(|slot| self.slot(*slot).is_some())
            .collect()
    }
}

impl BlockUnion for PdpPageBlock {
    type Variant<'a> = PdpVariant<'a>;

    fn variant(&self) -> PdpVariant<'_> {
        PdpPageBlock::variant(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page_block(value: serde_json::Value) -> PageBlock {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn single_slot_resolves_to_its_variant() {
        let block = page_block(json!({ "teaser": { "heading": "Hi" } }));
        match block.variant() {
            BlockVariant::Teaser(teaser) => assert_eq!(teaser.heading.as_deref(), Some("Hi")),
            other => panic!("expected teaser, got {other:?}"),
        }
        assert_eq!(block.variant().kind_name(), "teaser");
    }

    #[test]
    fn empty_block_is_unknown() {
        let block = page_block(json!({ "something_new": { "a": 1 }, "teaser": null }));
        assert_eq!(block.variant(), BlockVariant::Unknown);
        assert!(block.variant().is_unknown());
        assert!(block.populated_slots().is_empty());
    }

    #[test]
    fn multiple_slots_pick_highest_priority() {
        let block = page_block(json!({
            "text": { "content": "<p>body</p>" },
            "teaser": { "heading": "first" },
            "image_preset": { "alt": "x" }
        }));
        assert_eq!(block.variant().kind(), BlockKind::Teaser);
        assert_eq!(
            block.populated_slots(),
            [BlockKind::Teaser, BlockKind::Text, BlockKind::ImagePreset]
        );
    }

    #[test]
    fn kind_names_match_wire_names() {
        for kind in BlockKind::SLOTS {
            let block = page_block(json!({ kind.as_str(): {} }));
            assert_eq!(block.variant().kind(), kind, "{kind}");
        }
        for slot in PdpSlot::ALL {
            let block: PdpPageBlock = serde_json::from_value(json!({ slot.as_str(): {} })).unwrap();
            assert_eq!(block.variant().slot(), Some(slot), "{slot}");
        }
    }

    #[test]
    fn reserializes_populated_slots_only() {
        let raw = json!({ "quick_links": { "title": "Help" } });
        let block = page_block(raw.clone());
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }

    #[test]
    fn pdp_dynamic_slots_keep_their_name() {
        let block: PdpPageBlock = serde_json::from_value(json!({
            "reviews": { "dynamic_component": true, "label": "Reviews" },
            "quick_links": { "title": "ignored" }
        }))
        .unwrap();

        match block.variant() {
            PdpVariant::Dynamic(slot, component) => {
                assert_eq!(slot, PdpSlot::Reviews);
                assert_eq!(component.label.as_deref(), Some("Reviews"));
            }
            other => panic!("expected dynamic, got {other:?}"),
        }
        assert_eq!(block.variant().kind_name(), "reviews");
    }

    #[test]
    fn renderable_skips_unknown_blocks() {
        let blocks = vec![
            page_block(json!({ "text": {} })),
            page_block(json!({})),
            page_block(json!({ "api_component": { "component_name": "recs" } })),
        ];
        let kinds: Vec<_> = renderable(&blocks).iter().map(BlockVariant::kind).collect();
        assert_eq!(kinds, [BlockKind::Text, BlockKind::ApiComponent]);

        let pdp: Vec<PdpPageBlock> = serde_json::from_value(json!([
            { "payment": {} },
            { "unrelated": true }
        ]))
        .unwrap();
        assert_eq!(renderable(&pdp).len(), 1);
    }
}
