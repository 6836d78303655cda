#![allow(dead_code)]

use std::rc::Rc;

use hl7_model::{
    FieldSpec, FieldType, Group, Hl7Version, Message, ModelClassFactory, ModelError, Result,
    Segment, StructureType, TypeRegistry,
};

pub fn msh(segment: &mut Segment) -> Result<()> {
    segment.add_field(FieldSpec::new(FieldType::primitive("ST")).required(true).length(1));
    segment.add_field(FieldSpec::new(FieldType::primitive("ST")).required(true).length(4));
    segment.add_field(FieldSpec::new(FieldType::primitive("HD")).length(227));
    segment.add_field(FieldSpec::new(FieldType::primitive("MSG")).required(true).length(15));
    Ok(())
}

pub fn pid(segment: &mut Segment) -> Result<()> {
    segment.add_field(FieldSpec::new(FieldType::primitive("SI")).description("Set ID - PID"));
    segment.add_field(
        FieldSpec::new(FieldType::primitive("CX"))
            .required(true)
            .max_repetitions(0)
            .description("Patient Identifier List"),
    );
    segment.add_field(
        FieldSpec::new(FieldType::primitive("XPN"))
            .required(true)
            .max_repetitions(3)
            .description("Patient Name"),
    );
    Ok(())
}

pub fn obr(segment: &mut Segment) -> Result<()> {
    segment.add_field(FieldSpec::new(FieldType::primitive("SI")));
    segment.add_field(FieldSpec::new(FieldType::primitive("EI")));
    Ok(())
}

pub fn obx(segment: &mut Segment) -> Result<()> {
    segment.add_field(FieldSpec::new(FieldType::primitive("SI")));
    segment.add_field(FieldSpec::new(FieldType::primitive("ID")).required(true));
    segment.add_field(FieldSpec::new(FieldType::varies()).max_repetitions(0));
    Ok(())
}

pub fn nte(segment: &mut Segment) -> Result<()> {
    segment.add_field(FieldSpec::new(FieldType::primitive("SI")));
    segment.add_field(FieldSpec::new(FieldType::primitive("FT")).max_repetitions(0));
    Ok(())
}

pub fn broken(_segment: &mut Segment) -> Result<()> {
    Err(ModelError::Definition("ZBK has no field table".to_string()))
}

pub fn oru_r01(group: &mut Group) -> Result<()> {
    group.declare(StructureType::segment("MSH", msh), true, false);
    group.declare(
        StructureType::group("ORU_R01_PATIENT_RESULT", patient_result),
        true,
        true,
    );
    Ok(())
}

pub fn patient_result(group: &mut Group) -> Result<()> {
    group.declare(StructureType::group("ORU_R01_PATIENT", patient), false, false);
    group.declare(
        StructureType::group("ORU_R01_ORDER_OBSERVATION", order_observation),
        true,
        true,
    );
    Ok(())
}

pub fn patient(group: &mut Group) -> Result<()> {
    group.declare(StructureType::segment("PID", pid), true, false);
    group.declare(StructureType::segment("NTE", nte), false, true);
    Ok(())
}

pub fn order_observation(group: &mut Group) -> Result<()> {
    group.declare(StructureType::segment("OBR", obr), true, false);
    group.declare(StructureType::segment("NTE", nte), false, true);
    group.declare(
        StructureType::group("ORU_R01_OBSERVATION", observation),
        false,
        true,
    );
    Ok(())
}

pub fn observation(group: &mut Group) -> Result<()> {
    group.declare(StructureType::segment("OBX", obx), false, false);
    group.declare(StructureType::segment("NTE", nte), false, true);
    Ok(())
}

/// A message whose grammar repeats `NTE` at the top level.
pub fn tst_t01(group: &mut Group) -> Result<()> {
    group.declare(StructureType::segment("MSH", msh), true, false);
    group.declare(StructureType::segment("NTE", nte), false, true);
    group.declare(StructureType::segment("PID", pid), true, false);
    group.declare(StructureType::segment("NTE", nte), false, true);
    group.declare(StructureType::segment("NTE", nte), false, false);
    Ok(())
}

pub fn oru_type() -> StructureType {
    StructureType::group("ORU_R01", oru_r01)
}

pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    for version in [Hl7Version::V2_4, Hl7Version::V2_5] {
        registry
            .register_message(version, oru_type())
            .expect("ORU_R01");
        registry
            .register_message(version, StructureType::group("TST_T01", tst_t01))
            .expect("TST_T01");
        registry
            .register_group(
                version,
                StructureType::group("ORU_R01_OBSERVATION", observation),
            )
            .expect("ORU_R01_OBSERVATION");
        for segment in [
            StructureType::segment("MSH", msh),
            StructureType::segment("PID", pid),
            StructureType::segment("OBR", obr),
            StructureType::segment("OBX", obx),
            StructureType::segment("NTE", nte),
            StructureType::segment("ZBK", broken),
        ] {
            registry.register_segment(version, segment).expect("segment");
        }
    }
    registry
}

pub fn factory() -> Rc<dyn ModelClassFactory> {
    Rc::new(registry())
}

pub fn oru_message() -> Message {
    Message::new(&oru_type(), Hl7Version::V2_5, factory()).expect("ORU_R01")
}
