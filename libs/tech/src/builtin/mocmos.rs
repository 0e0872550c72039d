//! MOSIS scalable CMOS.
//!
//! A parametrized technology: the number of metal layers, the presence of a
//! second polysilicon layer, the transistor poly overhang and the foundry
//! are all chosen by parameters when an instance is built.

use arcstr::ArcStr;

use crate::definition::{EdgeDef, FoundryDef, LayerFunction, NodeDef, NodeLayerDef, TechDefinition};
use crate::error::{Result, TechError};
use crate::param::{Param, ParamMap, ParamValue};

/// The technology name.
pub const NAME: &str = "mocmos";

/// Number of metal layers.
pub const NUM_METAL_LAYERS: &str = "MoCMOS.NumMetalLayers";
/// Whether the second polysilicon layer is available.
pub const SECOND_POLYSILICON: &str = "MoCMOS.SecondPolysilicon";
/// Whether vias may be stacked directly on top of each other.
pub const DISALLOW_STACKED_VIAS: &str = "MoCMOS.DisallowStackedVias";
/// Whether the alternate active and poly rules are in effect.
pub const ALTERNATE_ACTIVE_POLY_RULES: &str = "MoCMOS.AlternateActivePolyRules";
/// Whether analog design rules are in effect.
pub const ANALOG_MODE: &str = "MoCMOS.AnalogMode";
/// The foundry whose stream layers are used.
pub const FOUNDRY: &str = "MoCMOS.Foundry";

/// The MOSIS foundry.
pub const MOSIS: &str = "MOSIS";
/// The TSMC foundry.
pub const TSMC: &str = "TSMC";

const MIN_METALS: i64 = 2;
const MAX_METALS: i64 = 6;

/// Poly extension past active in transistors, in lambda.
const POLY_OVERHANG: f64 = 2.0;
const ALTERNATE_POLY_OVERHANG: f64 = 2.5;

/// The parameters of the technology.
pub fn schema() -> Vec<Param> {
    vec![
        Param::new(NUM_METAL_LAYERS, "technology/mocmos/NumMetalLayers", MAX_METALS),
        Param::new(SECOND_POLYSILICON, "technology/mocmos/SecondPolysilicon", false),
        Param::new(DISALLOW_STACKED_VIAS, "technology/mocmos/DisallowStackedVias", false),
        Param::new(
            ALTERNATE_ACTIVE_POLY_RULES,
            "technology/mocmos/AlternateActivePolyRules",
            false,
        ),
        Param::new(ANALOG_MODE, "technology/mocmos/AnalogMode", false),
        Param::new(FOUNDRY, "technology/mocmos/Foundry", MOSIS),
    ]
}

fn metal(n: i64) -> ArcStr {
    arcstr::format!("metal-{}", n)
}

fn via(n: i64) -> ArcStr {
    arcstr::format!("via-{}", n)
}

/// The definition with every optional layer present.
pub fn full_definition(poly_overhang: f64) -> TechDefinition {
    let mut def = TechDefinition::new(NAME).with_scale(200.0);
    for n in 1..=MAX_METALS {
        def = def.layer(metal(n), LayerFunction::Metal(n as u8));
    }
    def = def
        .layer("poly-1", LayerFunction::Poly(1))
        .layer("poly-2", LayerFunction::Poly(2))
        .layer("p-active", LayerFunction::Diffusion)
        .layer("n-active", LayerFunction::Diffusion)
        .layer("p-select", LayerFunction::Implant)
        .layer("n-select", LayerFunction::Implant)
        .layer("p-well", LayerFunction::Well)
        .layer("n-well", LayerFunction::Well)
        .layer("poly-cut", LayerFunction::Contact)
        .layer("active-cut", LayerFunction::Contact);
    for n in 1..MAX_METALS {
        def = def.layer(via(n), LayerFunction::Via(n as u8));
    }

    def = def.foundry(mosis()).foundry(tsmc());

    for n in 1..=MAX_METALS {
        def = def.node(NodeDef::new(arcstr::format!("metal-{}-pin", n), 3.0, 3.0).full(metal(n)));
    }
    for n in 1..MAX_METALS {
        def = def.node(
            NodeDef::new(arcstr::format!("metal-{}-metal-{}-con", n, n + 1), 5.0, 5.0)
                .inset(metal(n), 0.5)
                .inset(metal(n + 1), 0.5)
                .inset(via(n), 1.5),
        );
    }

    def.node(NodeDef::new("poly-1-pin", 2.0, 2.0).full("poly-1"))
        .node(NodeDef::new("poly-2-pin", 3.0, 3.0).full("poly-2"))
        .node(
            NodeDef::new("metal-1-poly-1-con", 5.0, 5.0)
                .inset("metal-1", 0.5)
                .full("poly-1")
                .inset("poly-cut", 1.5),
        )
        .node(
            NodeDef::new("metal-1-poly-2-con", 6.0, 6.0)
                .inset("metal-1", 1.0)
                .full("poly-2")
                .inset("poly-cut", 2.0),
        )
        .node(active_contact("metal-1-n-active-con", "n-active", "n-select", "p-well"))
        .node(active_contact("metal-1-p-active-con", "p-active", "p-select", "n-well"))
        .node(transistor("n-transistor", "n-active", "n-select", "p-well", poly_overhang))
        .node(transistor("p-transistor", "p-active", "p-select", "n-well", poly_overhang))
}

fn mosis() -> FoundryDef {
    FoundryDef::new(MOSIS)
        .stream("metal-1", "49,49/1p")
        .stream("metal-2", "51,51/1p")
        .stream("metal-3", "62,62/1p")
        .stream("metal-4", "31,31/1p")
        .stream("metal-5", "33,33/1p")
        .stream("metal-6", "37,37/1p")
        .stream("poly-1", "46,46/1p")
        .stream("poly-2", "56")
        .stream("p-active", "43")
        .stream("n-active", "43")
        .stream("p-select", "44")
        .stream("n-select", "45")
        .stream("p-well", "41")
        .stream("n-well", "42")
        .stream("poly-cut", "25")
        .stream("active-cut", "25")
        .stream("via-1", "50")
        .stream("via-2", "61")
        .stream("via-3", "30")
        .stream("via-4", "32")
        .stream("via-5", "36")
}

fn tsmc() -> FoundryDef {
    FoundryDef::new(TSMC)
        .stream("metal-1", "16/0,16/2p,16/1t")
        .stream("metal-2", "18/0,18/2p,18/1t")
        .stream("metal-3", "28/0,28/2p,28/1t")
        .stream("metal-4", "29/0,29/2p,29/1t")
        .stream("metal-5", "31/0,31/2p,31/1t")
        .stream("metal-6", "32/0,32/2p,32/1t")
        .stream("poly-1", "13/0,13/2p")
        .stream("p-active", "6/0")
        .stream("n-active", "6/0")
        .stream("p-select", "8/0")
        .stream("n-select", "7/0")
        .stream("n-well", "3/0")
        .stream("poly-cut", "15/0")
        .stream("active-cut", "15/0")
        .stream("via-1", "17/0")
        .stream("via-2", "27/0")
        .stream("via-3", "29/1")
        .stream("via-4", "33/0")
        .stream("via-5", "39/0")
}

fn active_contact(name: &str, active: &str, select: &str, well: &str) -> NodeDef {
    NodeDef::new(name, 17.0, 17.0)
        .with_offset(6.0, 6.0, 6.0, 6.0)
        .inset("metal-1", 6.5)
        .inset(active, 6.0)
        .inset(select, 4.0)
        .full(well)
        .inset("active-cut", 7.5)
}

fn transistor(name: &str, active: &str, select: &str, well: &str, poly_overhang: f64) -> NodeDef {
    // Active runs vertically through the middle, the gate crosses it.
    let active_inset_x = 6.0;
    let gate_inset_y = 10.0;
    let poly_inset_x = active_inset_x - poly_overhang;
    NodeDef::new(name, 15.0, 22.0)
        .with_offset(poly_inset_x, poly_inset_x, 6.0, 6.0)
        .layer(NodeLayerDef::new(
            active,
            EdgeDef::new(-0.5, active_inset_x),
            EdgeDef::new(0.5, -active_inset_x),
            EdgeDef::new(-0.5, 6.0),
            EdgeDef::new(0.5, -6.0),
        ))
        .layer(NodeLayerDef::new(
            "poly-1",
            EdgeDef::new(-0.5, poly_inset_x),
            EdgeDef::new(0.5, -poly_inset_x),
            EdgeDef::new(-0.5, gate_inset_y),
            EdgeDef::new(0.5, -gate_inset_y),
        ))
        .layer(NodeLayerDef::new(
            select,
            EdgeDef::new(-0.5, active_inset_x - 2.0),
            EdgeDef::new(0.5, 2.0 - active_inset_x),
            EdgeDef::new(-0.5, 4.0),
            EdgeDef::new(0.5, -4.0),
        ))
        .full(well)
}

fn bool_param(params: &ParamMap, path: &str) -> bool {
    params.get(path).and_then(ParamValue::as_bool).unwrap_or(false)
}

/// Produces the definition for the given parameter values.
///
/// Metal layers and vias above the requested metal count are removed, as is
/// the second polysilicon layer unless requested. The metal count must be
/// between 2 and 6.
pub fn patch(params: &ParamMap) -> Result<TechDefinition> {
    let num_metals = params
        .get(NUM_METAL_LAYERS)
        .and_then(ParamValue::as_int)
        .unwrap_or(MAX_METALS);
    if !(MIN_METALS..=MAX_METALS).contains(&num_metals) {
        return Err(TechError::InvalidParameter {
            path: NUM_METAL_LAYERS.into(),
            reason: arcstr::format!(
                "{} metal layers requested, supported range is {}..={}",
                num_metals,
                MIN_METALS,
                MAX_METALS
            ),
        });
    }
    let second_poly = bool_param(params, SECOND_POLYSILICON);
    let alternate_rules = bool_param(params, ALTERNATE_ACTIVE_POLY_RULES);
    let foundry = params
        .get(FOUNDRY)
        .and_then(ParamValue::as_str)
        .cloned()
        .unwrap_or_else(|| MOSIS.into());

    let overhang = if alternate_rules {
        ALTERNATE_POLY_OVERHANG
    } else {
        POLY_OVERHANG
    };
    let mut def = full_definition(overhang);
    if !def.foundries.iter().any(|f| f.name == foundry) {
        return Err(TechError::InvalidParameter {
            path: FOUNDRY.into(),
            reason: arcstr::format!("unknown foundry `{}`", foundry),
        });
    }

    def.retain_layers(|layer| match layer.function {
        LayerFunction::Metal(n) => i64::from(n) <= num_metals,
        LayerFunction::Via(n) => i64::from(n) < num_metals,
        LayerFunction::Poly(2) => second_poly,
        _ => true,
    });

    def.description = arcstr::format!(
        "MOSIS CMOS ({} metal layers, {} poly, {} rules)",
        num_metals,
        if second_poly { 2 } else { 1 },
        foundry
    );
    def.default_foundry = Some(foundry);
    Ok(def)
}
