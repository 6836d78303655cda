//! Built-in demo definitions.
//!
//! A small subset of the HL7 v2.5 grammar for `ADT_A01` and `ORU_R01`,
//! registered for every supported version. Composite datatypes are carried as
//! string primitives.

use hl7_model::{
    FieldSpec, FieldType, Group, Hl7Version, Result, Segment, StructureType, TypeRegistry,
};

/// (datatype, required, max repetitions, length, description); `0` repetitions
/// means unbounded.
type FieldRow = (&'static str, bool, i32, usize, &'static str);

const MSH_FIELDS: &[FieldRow] = &[
    ("ST", true, 1, 1, "Field Separator"),
    ("ST", true, 1, 4, "Encoding Characters"),
    ("HD", false, 1, 227, "Sending Application"),
    ("HD", false, 1, 227, "Sending Facility"),
    ("HD", false, 1, 227, "Receiving Application"),
    ("HD", false, 1, 227, "Receiving Facility"),
    ("TS", true, 1, 26, "Date/Time Of Message"),
    ("ST", false, 1, 40, "Security"),
    ("MSG", true, 1, 15, "Message Type"),
    ("ST", true, 1, 20, "Message Control ID"),
    ("PT", true, 1, 3, "Processing ID"),
    ("VID", true, 1, 60, "Version ID"),
];

const EVN_FIELDS: &[FieldRow] = &[
    ("ID", false, 1, 3, "Event Type Code"),
    ("TS", true, 1, 26, "Recorded Date/Time"),
    ("TS", false, 1, 26, "Date/Time Planned Event"),
    ("IS", false, 1, 3, "Event Reason Code"),
];

const PID_FIELDS: &[FieldRow] = &[
    ("SI", false, 1, 4, "Set ID - PID"),
    ("CX", false, 1, 20, "Patient ID"),
    ("CX", true, 0, 250, "Patient Identifier List"),
    ("CX", false, 0, 20, "Alternate Patient ID - PID"),
    ("XPN", true, 0, 250, "Patient Name"),
    ("XPN", false, 0, 250, "Mother's Maiden Name"),
    ("TS", false, 1, 26, "Date/Time of Birth"),
    ("IS", false, 1, 1, "Administrative Sex"),
];

const PV1_FIELDS: &[FieldRow] = &[
    ("SI", false, 1, 4, "Set ID - PV1"),
    ("IS", true, 1, 1, "Patient Class"),
    ("PL", false, 1, 80, "Assigned Patient Location"),
];

const ORC_FIELDS: &[FieldRow] = &[
    ("ID", true, 1, 2, "Order Control"),
    ("EI", false, 1, 22, "Placer Order Number"),
    ("EI", false, 1, 22, "Filler Order Number"),
];

const OBR_FIELDS: &[FieldRow] = &[
    ("SI", false, 1, 4, "Set ID - OBR"),
    ("EI", false, 1, 22, "Placer Order Number"),
    ("EI", false, 1, 22, "Filler Order Number"),
    ("CE", true, 1, 250, "Universal Service Identifier"),
];

const OBX_FIELDS: &[FieldRow] = &[
    ("SI", false, 1, 4, "Set ID - OBX"),
    ("ID", false, 1, 2, "Value Type"),
    ("CE", true, 1, 250, "Observation Identifier"),
    ("ST", false, 1, 20, "Observation Sub-ID"),
    ("*", false, 0, 99999, "Observation Value"),
    ("CE", false, 1, 250, "Units"),
];

const NTE_FIELDS: &[FieldRow] = &[
    ("SI", false, 1, 4, "Set ID - NTE"),
    ("ID", false, 1, 8, "Source of Comment"),
    ("FT", false, 0, 65536, "Comment"),
];

fn field_type(name: &str) -> FieldType {
    if name == hl7_model::VARIES_TYPE_NAME {
        FieldType::varies()
    } else {
        FieldType::primitive(name)
    }
}

fn declare_fields(segment: &mut Segment, rows: &[FieldRow]) {
    for &(datatype, required, max_repetitions, length, description) in rows {
        segment.add_field(
            FieldSpec::new(field_type(datatype))
                .required(required)
                .max_repetitions(max_repetitions)
                .length(length)
                .description(description),
        );
    }
}

fn msh(segment: &mut Segment) -> Result<()> {
    declare_fields(segment, MSH_FIELDS);
    Ok(())
}

fn evn(segment: &mut Segment) -> Result<()> {
    declare_fields(segment, EVN_FIELDS);
    Ok(())
}

fn pid(segment: &mut Segment) -> Result<()> {
    declare_fields(segment, PID_FIELDS);
    Ok(())
}

fn pv1(segment: &mut Segment) -> Result<()> {
    declare_fields(segment, PV1_FIELDS);
    Ok(())
}

fn orc(segment: &mut Segment) -> Result<()> {
    declare_fields(segment, ORC_FIELDS);
    Ok(())
}

fn obr(segment: &mut Segment) -> Result<()> {
    declare_fields(segment, OBR_FIELDS);
    Ok(())
}

fn obx(segment: &mut Segment) -> Result<()> {
    declare_fields(segment, OBX_FIELDS);
    Ok(())
}

fn nte(segment: &mut Segment) -> Result<()> {
    declare_fields(segment, NTE_FIELDS);
    Ok(())
}

fn adt_a01(group: &mut Group) -> Result<()> {
    group.declare(StructureType::segment("MSH", msh), true, false);
    group.declare(StructureType::segment("EVN", evn), true, false);
    group.declare(StructureType::segment("PID", pid), true, false);
    group.declare(StructureType::segment("PV1", pv1), true, false);
    group.declare(StructureType::segment("OBX", obx), false, true);
    Ok(())
}

fn oru_r01(group: &mut Group) -> Result<()> {
    group.declare(StructureType::segment("MSH", msh), true, false);
    group.declare(
        StructureType::group("ORU_R01_PATIENT_RESULT", oru_r01_patient_result),
        true,
        true,
    );
    Ok(())
}

fn oru_r01_patient_result(group: &mut Group) -> Result<()> {
    group.declare(
        StructureType::group("ORU_R01_PATIENT", oru_r01_patient),
        false,
        false,
    );
    group.declare(
        StructureType::group("ORU_R01_ORDER_OBSERVATION", oru_r01_order_observation),
        true,
        true,
    );
    Ok(())
}

fn oru_r01_patient(group: &mut Group) -> Result<()> {
    group.declare(StructureType::segment("PID", pid), true, false);
    group.declare(StructureType::segment("NTE", nte), false, true);
    group.declare(
        StructureType::group("ORU_R01_VISIT", oru_r01_visit),
        false,
        false,
    );
    Ok(())
}

fn oru_r01_visit(group: &mut Group) -> Result<()> {
    group.declare(StructureType::segment("PV1", pv1), true, false);
    Ok(())
}

fn oru_r01_order_observation(group: &mut Group) -> Result<()> {
    group.declare(StructureType::segment("ORC", orc), false, false);
    group.declare(StructureType::segment("OBR", obr), true, false);
    group.declare(StructureType::segment("NTE", nte), false, true);
    group.declare(
        StructureType::group("ORU_R01_OBSERVATION", oru_r01_observation),
        true,
        true,
    );
    Ok(())
}

fn oru_r01_observation(group: &mut Group) -> Result<()> {
    group.declare(StructureType::segment("OBX", obx), true, false);
    group.declare(StructureType::segment("NTE", nte), false, true);
    Ok(())
}

fn segment_types() -> Vec<StructureType> {
    vec![
        StructureType::segment("MSH", msh),
        StructureType::segment("EVN", evn),
        StructureType::segment("PID", pid),
        StructureType::segment("PV1", pv1),
        StructureType::segment("ORC", orc),
        StructureType::segment("OBR", obr),
        StructureType::segment("OBX", obx),
        StructureType::segment("NTE", nte),
    ]
}

fn group_types() -> Vec<StructureType> {
    vec![
        StructureType::group("ORU_R01_PATIENT_RESULT", oru_r01_patient_result),
        StructureType::group("ORU_R01_PATIENT", oru_r01_patient),
        StructureType::group("ORU_R01_VISIT", oru_r01_visit),
        StructureType::group("ORU_R01_ORDER_OBSERVATION", oru_r01_order_observation),
        StructureType::group("ORU_R01_OBSERVATION", oru_r01_observation),
    ]
}

fn message_types() -> Vec<StructureType> {
    vec![
        StructureType::group("ADT_A01", adt_a01),
        StructureType::group("ORU_R01", oru_r01),
    ]
}

const DATATYPES: &[&str] = &[
    "CE", "CX", "EI", "FT", "HD", "ID", "IS", "MSG", "PL", "PT", "SI", "ST", "TS", "VID", "XPN",
];

/// Registry holding the demo definitions for every supported version.
pub fn demo_registry() -> Result<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    for version in Hl7Version::ALL {
        for message in message_types() {
            registry.register_message(version, message)?;
        }
        for group in group_types() {
            registry.register_group(version, group)?;
        }
        for segment in segment_types() {
            registry.register_segment(version, segment)?;
        }
        for datatype in DATATYPES {
            registry.register_datatype(version, FieldType::primitive(*datatype));
        }
        registry.register_datatype(version, FieldType::varies());
    }
    Ok(registry)
}
