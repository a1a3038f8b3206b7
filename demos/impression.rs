use radlogic::{compile, LayerRole, LayerStack, RuleLayer};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let global = RuleLayer::text(
        "Exclusions:\n\
         - degenerative change\n\
         Priority Keywords:\n\
         - fracture\n\
         Custom Rules:\n\
         - Lead with the most clinically urgent finding",
    );
    let study = RuleLayer::text(
        "Exclusions:\n\
         • small joint effusion (unless larger than 1 cm)\n\
         Example: Baker cyst (unless ruptured)",
    );

    let logic = LayerStack::new()
        .rules(LayerRole::Global, &global)
        .rules(LayerRole::StudyOverride, &study)
        .merge();

    let findings = "Complex tear of the posterior horn of the medial meniscus. \
                    Small joint effusion. Mild tricompartmental degenerative change.";

    println!("{}", compile(findings, &logic, None, None));
}
