use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use approx::assert_relative_eq;
use arcstr::ArcStr;
use test_log::test;

use crate::builtin::mocmos;
use crate::definition::{path_to_url, FoundryDef, NodeDef, TechDefinition};
use crate::error::EmbedError;
use crate::implementation::Implementations;
use crate::param::fill_params;
use crate::persist;
use crate::prelude::*;

const USER_DEFINITION: &str = r#"
name = "NAME"
description = "A user technology"
scale_nm = 150.0

[[layers]]
name = "metal"
function = { metal = 1 }

[[layers]]
name = "glass"

[[foundries]]
name = "fab"

[foundries.stream]
metal = "10/0,10/1p"
glass = "bogus"

[[nodes]]
name = "metal-pin"
width = 2.0
height = 2.0

[[nodes.layers]]
layer = "metal"
"#;

fn write_definition(dir: &Path, file: &str, name: &str) -> PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, USER_DEFINITION.replace("NAME", name)).unwrap();
    path
}

fn registry() -> Registry {
    Registry::standard(&TechConfig::default())
}

fn overrides(entries: &[(&str, ParamValue)]) -> ParamMap {
    entries
        .iter()
        .map(|(path, value)| ((*path).into(), value.clone()))
        .collect()
}

fn mocmos_with(entries: &[(&str, ParamValue)]) -> Option<Technology> {
    let registry = registry();
    registry.new_instance(mocmos::NAME, registry.generic_context(), &overrides(entries))
}

#[test]
fn builtins_build() {
    let registry = registry();
    for name in ["generic", "artwork", "schematic", "mocmos"] {
        let tech = registry
            .new_instance(name, registry.generic_context(), &ParamMap::new())
            .unwrap();
        assert_eq!(tech.name(), name);
        assert!(tech.is_setup());
        assert_eq!(tech.generic().map(|g| g.as_str()), Some("generic"));
    }
    assert!(registry.missing().is_empty());
}

#[test]
fn registry_lists_recipes_in_order() {
    let registry = registry();
    let names: Vec<_> = registry.names().map(|name| name.as_str()).collect();
    assert_eq!(
        names,
        [
            "generic",
            "artwork",
            "schematic",
            "mocmos",
            "bicmos",
            "cmos",
            "nmos",
            "cmos90",
            "tsmc180"
        ]
    );
    assert_eq!(registry.iter().count(), names.len());
    assert!(registry.get("bipolar").is_none());
    assert!(registry.get("rcmos").is_none());
}

#[test]
fn resources_are_omitted_without_resource_dirs() {
    let registry = Registry::standard(&TechConfig::empty());
    for name in ["bicmos", "bipolar", "cmos", "nmos", "rcmos"] {
        assert!(registry.get(name).is_none(), "{name} should not be registered");
    }
    assert!(registry.get("mocmos").is_some());
}

#[test]
fn env_resource_dirs_are_searched() {
    let dir = tempfile::tempdir().unwrap();
    write_definition(dir.path(), "rcmos.toml", "rcmos");
    let config = TechConfig::default().with_env_value(dir.path());
    let registry = Registry::standard(&config);

    let names: Vec<_> = registry.names().map(|name| name.as_str()).collect();
    let nmos = names.iter().position(|name| *name == "nmos").unwrap();
    assert_eq!(names[nmos + 1], "rcmos");

    let rcmos = registry
        .new_instance("rcmos", registry.generic_context(), &ParamMap::new())
        .unwrap();
    assert_eq!(rcmos.description(), "A user technology");
    assert!(!registry.get("rcmos").unwrap().is_user_defined());
}

#[test]
fn wrongly_typed_override_falls_back_to_default() {
    let default = mocmos_with(&[]).unwrap();
    let wrong = mocmos_with(&[
        (mocmos::NUM_METAL_LAYERS, ParamValue::from("four")),
        (mocmos::SECOND_POLYSILICON, ParamValue::Int(1)),
    ])
    .unwrap();
    assert_eq!(default, wrong);
    assert_eq!(wrong.param(mocmos::NUM_METAL_LAYERS), Some(&ParamValue::Int(6)));
}

#[test]
fn fill_params_uses_schema_only() {
    let schema = mocmos::schema();
    let filled = fill_params(
        &schema,
        &overrides(&[
            ("MoCMOS.Bogus", ParamValue::Int(1)),
            (mocmos::NUM_METAL_LAYERS, ParamValue::Int(3)),
            (mocmos::ANALOG_MODE, ParamValue::Double(1.0)),
        ]),
    );
    assert_eq!(filled.len(), schema.len());
    assert!(!filled.contains_key("MoCMOS.Bogus"));
    assert_eq!(filled[mocmos::NUM_METAL_LAYERS], ParamValue::Int(3));
    assert_eq!(filled[mocmos::ANALOG_MODE], ParamValue::Bool(false));
    assert_eq!(filled[mocmos::FOUNDRY], ParamValue::from("MOSIS"));

    let paths: Vec<_> = filled.keys().collect();
    let schema_paths: Vec<_> = schema.iter().map(|param| param.path()).collect();
    assert_eq!(paths, schema_paths);
}

#[test]
fn params_are_identified_by_path() {
    let a = Param::new("Tech.A", "tech/a", 1);
    let b = Param::new("Tech.A", "tech/other", false);
    let c = Param::new("Tech.C", "tech/a", 1);
    assert_eq!(a, b);
    assert_ne!(a, c);
    let set: HashSet<_> = [a, b, c].into_iter().collect();
    assert_eq!(set.len(), 2);

    assert!(ParamValue::Double(0.5).same_type(&ParamValue::Double(2.0)));
    assert!(!ParamValue::Bool(true).same_type(&ParamValue::Int(1)));
    assert_relative_eq!(ParamValue::from(0.25).as_double().unwrap(), 0.25);
}

#[test]
fn metal_count_patches_layers_and_nodes() {
    let tech = mocmos_with(&[(mocmos::NUM_METAL_LAYERS, ParamValue::Int(3))]).unwrap();
    assert!(tech.layer("metal-3").is_some());
    assert!(tech.layer("metal-4").is_none());
    assert!(tech.layer("via-2").is_some());
    assert!(tech.layer("via-3").is_none());
    assert!(tech.node("metal-2-metal-3-con").is_some());
    assert!(tech.node("metal-3-metal-4-con").is_none());
    assert!(tech.node("metal-4-pin").is_none());
    assert!(tech.stream_layers("metal-4").is_none());
    assert_eq!(
        tech.layer("metal-3").unwrap().function(),
        LayerFunction::Metal(3)
    );
    assert_eq!(
        tech.description(),
        "MOSIS CMOS (3 metal layers, 1 poly, MOSIS rules)"
    );
}

#[test]
fn second_poly_is_optional() {
    let tech = mocmos_with(&[]).unwrap();
    assert!(tech.layer("poly-2").is_none());
    assert!(tech.node("metal-1-poly-2-con").is_none());

    let tech = mocmos_with(&[(mocmos::SECOND_POLYSILICON, ParamValue::Bool(true))]).unwrap();
    assert!(tech.layer("poly-2").is_some());
    assert!(tech.node("metal-1-poly-2-con").is_some());
    assert_eq!(tech.stream_layers("poly-2").unwrap().drawing().unwrap().number(), 56);
}

#[test]
fn out_of_range_metal_count_builds_nothing() {
    let registry = registry();
    let ctx = registry.generic_context();
    let overrides = overrides(&[(mocmos::NUM_METAL_LAYERS, ParamValue::Int(7))]);
    assert!(registry.new_instance("mocmos", ctx, &overrides).is_none());
    assert!(matches!(
        registry
            .get("mocmos")
            .unwrap()
            .try_new_instance(ctx, &overrides),
        Err(TechError::InvalidParameter { .. })
    ));
    assert!(registry.missing().is_empty());
}

#[test]
fn foundry_selects_stream_layers() {
    let mosis = mocmos_with(&[]).unwrap();
    assert_eq!(mosis.foundry().map(|f| f.as_str()), Some("MOSIS"));
    let metal1 = mosis.stream_layers("metal-1").unwrap();
    assert_eq!(metal1.drawing(), Some(StreamLayer::new(49, None)));
    assert_eq!(metal1.pin(), Some(StreamLayer::new(49, Some(1))));
    assert_eq!(metal1.text(), None);

    let tsmc = mocmos_with(&[(mocmos::FOUNDRY, ParamValue::from("TSMC"))]).unwrap();
    assert_eq!(tsmc.foundry().map(|f| f.as_str()), Some("TSMC"));
    let metal1 = tsmc.stream_layers("metal-1").unwrap();
    assert_eq!(metal1.drawing(), Some(StreamLayer::new(16, Some(0))));
    assert_eq!(metal1.text(), Some(StreamLayer::new(16, Some(1))));
    assert!(tsmc.stream_layers("p-well").is_none());

    assert_eq!(
        tsmc.stream_layers_for("MOSIS", "metal-1"),
        mosis.stream_layers("metal-1").copied()
    );
    assert_eq!(tsmc.stream_layers_for("UMC", "metal-1"), None);
}

#[test]
fn unknown_foundry_parameter_is_rejected() {
    assert!(mocmos_with(&[(mocmos::FOUNDRY, ParamValue::from("UMC"))]).is_none());
}

#[test]
fn configured_foundry_overrides_default() {
    let registry = Registry::standard(&TechConfig::default().with_foundry("TSMC"));
    let ctx = registry.generic_context();
    let mocmos = registry.new_instance("mocmos", ctx, &ParamMap::new()).unwrap();
    assert_eq!(mocmos.foundry().map(|f| f.as_str()), Some("TSMC"));

    // cmos has no TSMC rules.
    let cmos = registry.new_instance("cmos", ctx, &ParamMap::new()).unwrap();
    assert_eq!(cmos.foundry().map(|f| f.as_str()), Some("MOSIS"));
}

#[test]
fn node_geometry_scales_with_size() {
    let tech = mocmos_with(&[]).unwrap();
    let node = tech.node("metal-1-metal-2-con").unwrap();
    assert_eq!(node.default_size(), Dims::new(2000, 2000));

    let shapes = tech
        .node_geometry("metal-1-metal-2-con", node.default_size())
        .unwrap();
    let expected: Vec<(ArcStr, Rect)> = vec![
        ("metal-1".into(), Rect::from_sides(-800, -800, 800, 800)),
        ("metal-2".into(), Rect::from_sides(-800, -800, 800, 800)),
        ("via-1".into(), Rect::from_sides(-400, -400, 400, 400)),
    ];
    assert_eq!(shapes, expected);

    let shapes = tech
        .node_geometry("metal-1-metal-2-con", Dims::from_lambda(9.0, 5.0))
        .unwrap();
    assert_eq!(shapes[2].1, Rect::from_sides(-1200, -400, 1200, 400));

    assert!(tech.node_geometry("no-such-node", Dims::new(1, 1)).is_none());
}

#[test]
fn node_bounds_apply_offset() {
    let tech = mocmos_with(&[]).unwrap();
    let node = tech.node("n-transistor").unwrap();
    assert_eq!(node.default_size(), Dims::new(6000, 8800));
    assert_eq!(node.offset(), BoundsOffset::new(4.0, 4.0, 6.0, 6.0));
    assert_eq!(
        tech.node_bounds("n-transistor", node.default_size()),
        Some(Rect::from_sides(-1400, -2000, 1400, 2000))
    );

    let no_offset = tech.node("metal-1-pin").unwrap();
    assert!(no_offset.offset().is_zero());
    assert_eq!(
        no_offset.bounds(no_offset.default_size()),
        Rect::from_sides(-600, -600, 600, 600)
    );
}

#[test]
fn alternate_rules_extend_poly() {
    let poly = |tech: &Technology| {
        let node = tech.node("n-transistor").unwrap();
        node.shapes(node.default_size())
            .find(|(layer, _)| layer == "poly-1")
            .map(|(_, rect)| rect)
            .unwrap()
    };
    let standard = mocmos_with(&[]).unwrap();
    let alternate =
        mocmos_with(&[(mocmos::ALTERNATE_ACTIVE_POLY_RULES, ParamValue::Bool(true))]).unwrap();
    assert_eq!(poly(&standard), Rect::from_sides(-1400, -400, 1400, 400));
    assert_eq!(poly(&alternate), Rect::from_sides(-1600, -400, 1600, 400));
}

#[test]
fn general_multipliers_round() {
    let registry = registry();
    let schematic = registry
        .new_instance("schematic", registry.generic_context(), &ParamMap::new())
        .unwrap();
    let resistor = schematic.node("resistor").unwrap();
    assert_eq!(resistor.layers()[0].lx().code(), EdgeCode::General);
    let shapes: Vec<_> = resistor.shapes(resistor.default_size()).collect();
    assert_eq!(shapes[0].1, Rect::from_sides(-792, -200, 792, 200));
}

#[test]
fn resource_technologies_build() {
    let registry = registry();
    let ctx = registry.generic_context();

    let cmos = registry.new_instance("cmos", ctx, &ParamMap::new()).unwrap();
    assert_relative_eq!(cmos.scale_nm(), 2000.0);
    assert_eq!(cmos.layer("metal-1").unwrap().function(), LayerFunction::Metal(1));
    assert_eq!(cmos.layer("n-well").unwrap().function(), LayerFunction::Well);
    assert_eq!(
        cmos.stream_layers("metal-1").unwrap().pin(),
        Some(StreamLayer::new(49, Some(1)))
    );

    // Mead-Conway layer names are not stream layer numbers.
    let nmos = registry.new_instance("nmos", ctx, &ParamMap::new()).unwrap();
    assert_eq!(nmos.foundry().map(|f| f.as_str()), Some("Mead-Conway"));
    assert!(nmos.stream_layers("metal-1").is_none());
    let shapes = nmos
        .node_geometry("butting-con", Dims::from_lambda(4.0, 6.0))
        .unwrap();
    assert_eq!(shapes[1], (ArcStr::from("polysilicon"), Rect::from_sides(-800, 0, 800, 1200)));
    assert_eq!(shapes[2], (ArcStr::from("diffusion"), Rect::from_sides(-800, -1200, 800, 0)));

    let bicmos = registry.new_instance("bicmos", ctx, &ParamMap::new()).unwrap();
    assert_eq!(
        bicmos.node_bounds("npn-transistor", Dims::from_lambda(20.0, 20.0)),
        Some(Rect::from_sides(-3600, -3600, 3600, 3600))
    );
}

#[test]
fn restricted_technologies_are_recorded_quietly() {
    let registry = registry();
    let ctx = registry.generic_context();
    assert!(registry.is_restricted("cmos90"));
    assert!(!registry.is_restricted("mocmos"));

    assert!(registry.new_instance("cmos90", ctx, &ParamMap::new()).is_none());
    assert!(registry.new_instance("tsmc180", ctx, &ParamMap::new()).is_none());
    assert!(registry.new_instance("cmos90", ctx, &ParamMap::new()).is_none());
    assert_eq!(registry.missing().names(), ["cmos90", "tsmc180"]);
    assert!(registry.get("cmos90").unwrap().params().is_empty());
}

#[test]
fn missing_implementations_are_recorded() {
    let registry = Registry::bootstrap(&TechConfig::empty(), Implementations::new());
    let ctx = registry.generic_context();
    assert!(ctx.generic().is_none());
    assert!(registry.new_instance("artwork", ctx, &ParamMap::new()).is_none());
    assert!(registry.new_instance("mocmos", ctx, &ParamMap::new()).is_none());
    assert_eq!(registry.missing().names(), ["generic", "artwork", "mocmos"]);
    assert!(registry.missing().contains("artwork"));
    assert!(!registry.missing().contains("schematic"));
}

#[test]
fn retaining_layers_drops_dependent_nodes_and_streams() {
    let mut def = TechDefinition::new("trimmed")
        .layer("metal-1", LayerFunction::Metal(1))
        .layer("metal-2", LayerFunction::Metal(2))
        .layer("via-1", LayerFunction::Via(1))
        .foundry(
            FoundryDef::new("fab")
                .stream("metal-1", "49")
                .stream("metal-2", "51")
                .stream("via-1", "50"),
        )
        .node(NodeDef::new("metal-1-pin", 1.0, 1.0).full("metal-1"))
        .node(
            NodeDef::new("metal-1-metal-2-con", 4.0, 4.0)
                .full("metal-1")
                .full("metal-2")
                .inset("via-1", 1.0),
        );

    def.retain_layers(|layer| layer.function != LayerFunction::Metal(2));
    assert!(def.has_layer("metal-1"));
    assert!(def.has_layer("via-1"));
    assert!(!def.has_layer("metal-2"));
    let nodes: Vec<_> = def.nodes.iter().map(|node| node.name.as_str()).collect();
    assert_eq!(nodes, ["metal-1-pin"]);
    let streams: Vec<_> = def.foundries[0].stream.keys().map(|layer| layer.as_str()).collect();
    assert_eq!(streams, ["metal-1", "via-1"]);
}

#[test]
fn unknown_class_is_a_missing_implementation() {
    let registry = registry();
    let ctx = registry.generic_context();
    let def = TechDefinition::new("custom")
        .with_class("nonexistent")
        .layer("metal", LayerFunction::Metal(1));
    let factory = TechnologyFactory::from_definition(
        "custom",
        None,
        def,
        registry.implementations().clone(),
    );
    assert!(matches!(
        factory.try_new_instance(ctx, &ParamMap::new()),
        Err(TechError::MissingImplementation { .. })
    ));
    assert!(factory.new_instance(ctx, &ParamMap::new()).is_none());
    assert_eq!(registry.missing().names(), ["custom"]);
}

#[test]
fn nodes_may_draw_on_generic_layers() {
    let registry = registry();
    let def = TechDefinition::new("annotated")
        .layer("metal", LayerFunction::Metal(1))
        .node(NodeDef::new("metal-pin", 2.0, 2.0).full("metal").full("universal"));
    let factory = TechnologyFactory::from_definition(
        "annotated",
        None,
        def,
        registry.implementations().clone(),
    );
    assert!(factory
        .new_instance(registry.generic_context(), &ParamMap::new())
        .is_some());
    assert!(matches!(
        factory.try_new_instance(&GenericContext::new(), &ParamMap::new()),
        Err(TechError::Setup { .. })
    ));
}

#[test]
fn duplicate_layers_are_invalid() {
    let def = TechDefinition::new("twice")
        .layer("metal", LayerFunction::Metal(1))
        .layer("metal", LayerFunction::Metal(2));
    assert!(matches!(
        Technology::from_definition(&def, &ParamMap::new()),
        Err(TechError::InvalidDefinition { .. })
    ));
}

#[test]
fn user_definition_builds_and_skips_bad_specs() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_definition(dir.path(), "mine.toml", "mine");
    let registry = registry();
    let factory =
        TechnologyFactory::from_url("mine", path_to_url(&path), registry.implementations().clone());
    assert!(factory.is_user_defined());

    let tech = factory
        .new_instance(registry.generic_context(), &ParamMap::new())
        .unwrap();
    assert_relative_eq!(tech.scale_nm(), 150.0);
    assert_eq!(tech.layer("glass").unwrap().function(), LayerFunction::Unknown);
    assert_eq!(
        tech.stream_layers("metal"),
        Some(&"10/0,10/1p".parse::<LayerMapping>().unwrap())
    );
    assert!(tech.stream_layers("glass").is_none());
    assert_eq!(tech.foundry_named("fab").unwrap().spec("glass").unwrap(), "bogus");
}

#[test]
fn definition_is_loaded_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_definition(dir.path(), "once.toml", "once");
    let registry = registry();
    let factory = Arc::new(TechnologyFactory::from_url(
        "once",
        path_to_url(&path),
        registry.implementations().clone(),
    ));

    let loaded: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let factory = factory.clone();
                s.spawn(move || factory.definition().unwrap().unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(loaded.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));

    std::fs::remove_file(&path).unwrap();
    assert!(factory
        .new_instance(registry.generic_context(), &ParamMap::new())
        .is_some());
}

#[test]
fn failed_load_is_remembered() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("late.toml");
    let registry = registry();
    let ctx = registry.generic_context();
    let factory =
        TechnologyFactory::from_url("late", path_to_url(&path), registry.implementations().clone());

    assert!(matches!(
        factory.try_new_instance(ctx, &ParamMap::new()),
        Err(TechError::DefinitionLoad { .. })
    ));
    write_definition(dir.path(), "late.toml", "late");
    assert!(matches!(
        factory.try_new_instance(ctx, &ParamMap::new()),
        Err(TechError::DefinitionLoad { .. })
    ));
    assert!(registry.missing().is_empty());
}

#[test]
fn name_mismatch_builds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_definition(dir.path(), "mine.toml", "other");
    let registry = registry();
    let ctx = registry.generic_context();
    let factory =
        TechnologyFactory::from_url("mine", path_to_url(&path), registry.implementations().clone());

    assert!(factory.new_instance(ctx, &ParamMap::new()).is_none());
    match factory.try_new_instance(ctx, &ParamMap::new()) {
        Err(TechError::NameMismatch { expected, found }) => {
            assert_eq!(expected, "mine");
            assert_eq!(found, "other");
        }
        other => panic!("expected a name mismatch, got {:?}", other),
    }
    assert!(registry.missing().is_empty());
}

#[test]
fn shipped_reference_resolves_to_registered_factory() {
    let registry = registry();
    let factory = registry.get("mocmos").unwrap();

    let mut record = Vec::new();
    persist::write(&mut record, factory).unwrap();
    assert_eq!(record, b"\x00\x00\x00\x06mocmos\x00");

    let read = persist::read(&mut &record[..], &registry).unwrap();
    assert!(Arc::ptr_eq(&read, factory));
    assert!(read.definition().is_none());

    let cmos = registry.get("cmos").unwrap();
    let mut record = Vec::new();
    persist::write(&mut record, cmos).unwrap();
    let read = persist::read(&mut &record[..], &registry).unwrap();
    assert!(Arc::ptr_eq(&read, cmos));
}

#[test]
fn user_defined_reference_embeds_definition() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_definition(dir.path(), "mine.toml", "mine");
    let url = path_to_url(&path);
    let registry = registry();
    let factory =
        TechnologyFactory::from_url("mine", url.clone(), registry.implementations().clone());

    let mut record = Vec::new();
    persist::write(&mut record, &factory).unwrap();
    std::fs::remove_file(&path).unwrap();

    let read = persist::read(&mut &record[..], &registry).unwrap();
    assert_eq!(read.name(), "mine");
    assert!(read.is_user_defined());
    assert_eq!(read.url(), Some(&url));
    assert_eq!(
        read.definition().unwrap().unwrap(),
        factory.definition().unwrap().unwrap()
    );

    let tech = read
        .new_instance(registry.generic_context(), &ParamMap::new())
        .unwrap();
    assert_eq!(tech.description(), "A user technology");
}

#[test]
fn unloadable_definition_writes_empty_payload() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry();
    let factory = TechnologyFactory::from_url(
        "ghost",
        path_to_url(dir.path().join("ghost.toml")),
        registry.implementations().clone(),
    );

    assert!(matches!(
        persist::embedded_definition(&factory),
        Err(EmbedError::Load(TechError::DefinitionLoad { .. }))
    ));
    let mocmos = registry.get("mocmos").unwrap();
    assert!(matches!(
        persist::embedded_definition(mocmos),
        Err(EmbedError::NoDefinition)
    ));

    let mut record = Vec::new();
    persist::write(&mut record, &factory).unwrap();
    assert_eq!(&record[record.len() - 4..], &[0, 0, 0, 0]);

    assert!(matches!(
        persist::read(&mut &record[..], &registry),
        Err(PersistError::Definition { .. })
    ));
}

#[test]
fn malformed_records_are_errors() {
    let registry = registry();
    assert!(matches!(
        persist::read(&mut &b"\x00\x00\x00\x09x"[..], &registry),
        Err(PersistError::Io(_))
    ));
    assert!(matches!(
        persist::read(&mut &b"\x00\x00\x00\x05bogus\x00"[..], &registry),
        Err(PersistError::UnknownTechnology(name)) if name == "bogus"
    ));
    assert!(matches!(
        persist::read(&mut &b"\x00\x00\x00\x02\xff\xfe\x00"[..], &registry),
        Err(PersistError::Utf8(_))
    ));
    assert!(matches!(
        persist::read(&mut &b"\x00\x00\x00\x01x\x01\x00\x00\x00\x00\x03abc"[..], &registry),
        Err(PersistError::Definition { .. })
    ));
}

#[test]
fn missing_technologies_are_ordered_and_shared() {
    let missing = MissingTechnologies::new();
    let shared = missing.clone();
    assert!(missing.record("b"));
    assert!(shared.record("a"));
    assert!(!missing.record("b"));
    assert_eq!(shared.names(), ["b", "a"]);
    assert_eq!(missing.len(), 2);
}

#[test]
fn config_parses_toml() {
    let config = TechConfig::from_toml_str(
        r#"
        resource_dirs = ["/opt/tech", "/usr/share/tech"]
        foundry = "TSMC"
        "#,
    )
    .unwrap();
    assert_eq!(
        config.resource_dirs,
        [PathBuf::from("/opt/tech"), PathBuf::from("/usr/share/tech")]
    );
    assert_eq!(config.foundry.as_deref(), Some("TSMC"));

    assert_eq!(TechConfig::from_toml_str("").unwrap(), TechConfig::default());
    assert!(TechConfig::from_toml_str("resource_dirs = 3").is_err());
}

#[test]
fn config_file_resolves_relative_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tech.toml");
    std::fs::write(&path, "resource_dirs = [\"defs\", \"/abs\"]\n").unwrap();
    let config = TechConfig::from_file(&path).unwrap();
    assert_eq!(
        config.resource_dirs,
        [dir.path().join("defs"), PathBuf::from("/abs")]
    );
    assert!(TechConfig::from_file(dir.path().join("absent.toml")).is_err());
}

#[test]
fn env_value_prepends_dirs() {
    let joined = std::env::join_paths(["/first", "/second"]).unwrap();
    let config = TechConfig::empty()
        .with_env_value(&joined)
        .with_env_value("/zeroth");
    assert_eq!(
        config.resource_dirs,
        [
            PathBuf::from("/zeroth"),
            PathBuf::from("/first"),
            PathBuf::from("/second")
        ]
    );
    assert!(config.find_resource("cmos").is_none());
    assert!(TechConfig::default().find_resource("cmos").is_some());
}
