use shadow_rs::ShadowBuilder;

fn main() {
    // Exposes git and build metadata to `clap_long_version`.
    ShadowBuilder::builder()
        .build()
        .expect("shadow-rs build metadata");
}
