//! Integration tests for the GUI item translator and the overlay packet
//! builders, exercised through the crate's public API.

use bedrock_graves_core::{
    decode_packet,
    domain::label::{build_label, LabelFormat},
    encode_packet,
    protocol::synthetic::{self, OverlayGeometry},
    BlockPos, ClientboundPacket, EntityIdAllocator, GraveSnapshot, GuiTranslator, IconTexture,
    ItemKind, ItemStack, Text, TextColor,
};

/// A spread of stacks covering every resolution path, including malformed
/// ones (zero counts, unknown tags, empty names).
fn corpus() -> Vec<ItemStack> {
    let mut stacks = vec![
        ItemStack::empty(),
        ItemStack::new(ItemKind::Chest, 0),
        ItemStack::new(ItemKind::PlayerHead, 1),
        ItemStack::new(ItemKind::PlayerHead, 1).with_name(Text::empty()),
        ItemStack::new(ItemKind::PlayerHead, 3).with_name(Text::literal("Steve's Grave")),
        ItemStack::new(ItemKind::PlayerHead, 1).with_name(Text::literal("Decorative")),
        ItemStack::new(ItemKind::PlayerHead, 1)
            .with_name(Text::colored("Next", TextColor::DarkGray)),
        ItemStack::new(ItemKind::PlayerHead, 1).with_name(Text::literal("\u{a7}8Previous Page")),
        ItemStack::new(ItemKind::IconItem, 1),
        ItemStack::new(ItemKind::IconItem, 1).with_icon(IconTexture::Invalid),
        ItemStack::new(ItemKind::IconItem, 1)
            .with_icon(IconTexture::from_tag("definitely_not_a_tag"))
            .with_name(Text::literal("Close")),
        ItemStack::new(ItemKind::Other("minecraft:apple".into()), 64),
    ];
    for tag in [
        "next_page",
        "next_page_blocked",
        "previous_page",
        "previous_page_blocked",
        "quick_pickup",
        "break_grave",
        "remove_protection",
        "tater",
    ] {
        stacks.push(ItemStack::new(ItemKind::IconItem, 1).with_icon(IconTexture::from_tag(tag)));
        stacks.push(
            ItemStack::new(ItemKind::IconItem, 1)
                .with_icon(IconTexture::from_tag(tag))
                .with_name(Text::literal("Close this menu"))
                .with_lore(vec![Text::literal("lore line")]),
        );
    }
    stacks
}

#[test]
fn test_translate_is_idempotent_over_corpus() {
    for stack in corpus() {
        let once = GuiTranslator::translate(&stack).into_owned();
        let twice = GuiTranslator::translate(&once).into_owned();
        assert_eq!(once, twice, "input {stack:?}");
    }
}

#[test]
fn test_translate_never_emits_head_shaped_items_for_named_buttons() {
    for stack in corpus() {
        let out = GuiTranslator::translate(&stack);
        if stack.kind == ItemKind::IconItem {
            assert_ne!(out.kind, ItemKind::IconItem, "input {stack:?}");
            assert_ne!(out.kind, ItemKind::PlayerHead, "input {stack:?}");
        }
    }
}

#[test]
fn test_tag_wins_over_matching_name() {
    // "Close this menu" would hit the generic close rule (barrier).
    let stack = ItemStack::new(ItemKind::IconItem, 1)
        .with_icon(IconTexture::QuickPickup)
        .with_name(Text::literal("Close this menu"));

    let out = GuiTranslator::translate(&stack);

    assert_eq!(out.kind, ItemKind::Chest);
    assert_eq!(out.custom_name, Some(Text::literal("Close this menu")));
}

#[test]
fn test_disabled_navigation_never_maps_to_active_item() {
    for name in [
        Text::colored("Next Page", TextColor::DarkGray),
        Text::literal("\u{a7}8Next Page"),
        Text::empty().append(Text::colored("Previous Page", TextColor::DarkGray)),
        Text::colored("Next", TextColor::DarkGray),
    ] {
        let stack = ItemStack::new(ItemKind::PlayerHead, 1).with_name(name.clone());
        let out = GuiTranslator::translate(&stack);
        assert_eq!(out.kind, ItemKind::GrayStainedGlass, "name {name:?}");
    }
}

#[test]
fn test_overlay_spawn_sequence_survives_framing() {
    // Arrange
    let ids = EntityIdAllocator::new();
    let pos = BlockPos::new(100, 70, -40);
    let grave = GraveSnapshot {
        owner_name: Some("Alex".into()),
        death_cause: Some("Alex drowned".into()),
        items: vec![ItemStack::new(ItemKind::Other("minecraft:apple".into()), 5)],
        xp: 12,
        ..GraveSnapshot::default()
    };
    let geometry = OverlayGeometry::default();
    let label = build_label(&grave, &LabelFormat::default());

    let mut packets = synthetic::disguise(pos, 3);
    packets.extend(synthetic::spawn_label(ids.next(), pos, label, &geometry));
    let prop_id = ids.next();
    packets.extend(synthetic::spawn_prop(prop_id, pos, &geometry));
    packets.extend(synthetic::equip_and_hide(prop_id, grave.display_item()));

    // Act
    let mut buf = Vec::new();
    for packet in &packets {
        buf.extend(encode_packet(packet).expect("encode must succeed"));
    }
    let mut decoded = Vec::new();
    let mut cursor = 0;
    while cursor < buf.len() {
        let (packet, consumed) = decode_packet(&buf[cursor..]).expect("decode must succeed");
        decoded.push(packet);
        cursor += consumed;
    }

    // Assert
    assert_eq!(decoded, packets);
    assert!(decoded.iter().any(|p| matches!(
        p,
        ClientboundPacket::EntityEquipment { entity_id, item, .. }
            if *entity_id == prop_id && item.count == 1
    )));
}
