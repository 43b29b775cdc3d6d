//! Criterion benchmarks for the GUI item translator.
//!
//! The translator runs on every slot and inventory packet sent to a bridged
//! viewer, so a full 54-slot grave GUI must translate well inside a tick.
//!
//! Run with:
//! ```bash
//! cargo bench --package bedrock-graves-core --bench translate_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use bedrock_graves_core::{GuiTranslator, IconTexture, ItemKind, ItemStack, Text, TextColor};

fn tagged_icon() -> ItemStack {
    ItemStack::new(ItemKind::IconItem, 1)
        .with_name(Text::colored("Next Page", TextColor::Green))
        .with_icon(IconTexture::NextPage)
}

fn named_head() -> ItemStack {
    ItemStack::new(ItemKind::PlayerHead, 1).with_name(Text::literal("Click again to confirm"))
}

fn unmatched_head() -> ItemStack {
    ItemStack::new(ItemKind::PlayerHead, 1).with_name(Text::literal("Decorative banner"))
}

fn plain_item() -> ItemStack {
    ItemStack::new(ItemKind::Other("minecraft:diamond_sword".into()), 1)
}

/// A 54-slot grave GUI: stored items plus a bottom row of buttons.
fn grave_gui() -> Vec<ItemStack> {
    let mut slots: Vec<ItemStack> = (0..45).map(|_| plain_item()).collect();
    slots.push(tagged_icon());
    slots.push(named_head());
    slots.push(unmatched_head());
    slots.extend((0..6).map(|_| ItemStack::empty()));
    slots
}

fn bench_single_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate_single");
    let cases = [
        ("tagged_icon", tagged_icon()),
        ("keyword_rule", named_head()),
        ("paper_fallback", unmatched_head()),
        ("passthrough", plain_item()),
    ];
    for (name, stack) in cases.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), stack, |b, stack| {
            b.iter(|| GuiTranslator::translate(black_box(stack)).into_owned())
        });
    }
    group.finish();
}

fn bench_full_gui(c: &mut Criterion) {
    let gui = grave_gui();
    c.bench_function("translate_grave_gui_54_slots", |b| {
        b.iter(|| {
            black_box(&gui)
                .iter()
                .map(|s| GuiTranslator::translate(s).into_owned())
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(benches, bench_single_stack, bench_full_gui);
criterion_main!(benches);
