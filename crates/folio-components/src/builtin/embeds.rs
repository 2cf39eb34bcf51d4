//! One-off embeds used by individual posts.

use crate::{Props, html::opt_attr};

pub fn fancy_card_open() -> String {
    r#"<div class="fancy-card">"#.to_string()
}

/// Mount point for the RISC-V emulator. The script bundle looks for
/// `.wasm-riscv-emu` and reads the optional `data-program`.
pub fn wasm_riscv_emu_open(props: &Props) -> String {
    format!(
        r#"<div class="wasm-riscv-emu"{}><noscript>The RISC-V emulator needs JavaScript and WebAssembly.</noscript>"#,
        opt_attr("data-program", props.get("program"))
    )
}
