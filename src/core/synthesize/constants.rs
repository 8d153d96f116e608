//! Profiles, code systems and extension URLs of the KBV prescription bundle

// Profiles
pub const PROFILE_BUNDLE: &str = "https://fhir.kbv.de/StructureDefinition/KBV_PR_ERP_Bundle|1.0.2";
pub const PROFILE_PATIENT: &str = "https://fhir.kbv.de/StructureDefinition/KBV_PR_FOR_Patient|1.0.3";
pub const PROFILE_COVERAGE: &str = "https://fhir.kbv.de/StructureDefinition/KBV_PR_FOR_Coverage|1.0.3";
pub const PROFILE_PRACTITIONER: &str =
    "https://fhir.kbv.de/StructureDefinition/KBV_PR_FOR_Practitioner|1.0.3";
pub const PROFILE_ORGANIZATION: &str =
    "https://fhir.kbv.de/StructureDefinition/KBV_PR_FOR_Organization|1.0.3";
pub const PROFILE_MEDICATION: &str =
    "https://fhir.kbv.de/StructureDefinition/KBV_PR_ERP_Medication_PZN|1.0.2";
pub const PROFILE_MEDICATION_REQUEST: &str =
    "https://fhir.kbv.de/StructureDefinition/KBV_PR_ERP_Prescription|1.0.2";

// Identifier systems
pub const NS_PRESCRIPTION_ID: &str = "https://gematik.de/fhir/NamingSystem/PrescriptionID";
pub const NS_KVID: &str = "http://fhir.de/NamingSystem/gkv/kvid-10";
pub const NS_IKNR: &str = "http://fhir.de/NamingSystem/arge-ik/iknr";
pub const NS_LANR: &str = "https://fhir.kbv.de/NamingSystem/KBV_NS_Base_ANR";
pub const NS_BSNR: &str = "https://fhir.kbv.de/NamingSystem/KBV_NS_Base_BSNR";

// Code systems
pub const CS_V2_0203: &str = "http://terminology.hl7.org/CodeSystem/v2-0203";
pub const CS_IDENTIFIER_TYPE_DE: &str = "http://fhir.de/CodeSystem/identifier-type-de-basis";
pub const CS_GENDER_AMTLICH: &str = "http://fhir.de/CodeSystem/gender-amtlich-de";
pub const CS_VERSICHERUNGSART: &str = "http://fhir.de/CodeSystem/versicherungsart-de-basis";
pub const CS_PERSONENGRUPPE: &str = "https://fhir.kbv.de/CodeSystem/KBV_CS_SFHIR_KBV_PERSONENGRUPPE";
pub const CS_DMP: &str = "https://fhir.kbv.de/CodeSystem/KBV_CS_SFHIR_KBV_DMP";
pub const CS_VERSICHERTENSTATUS: &str =
    "https://fhir.kbv.de/CodeSystem/KBV_CS_SFHIR_KBV_VERSICHERTENSTATUS";
pub const CS_WOP: &str = "https://fhir.kbv.de/CodeSystem/KBV_CS_SFHIR_ITA_WOP";
pub const CS_QUALIFICATION_TYPE: &str =
    "https://fhir.kbv.de/CodeSystem/KBV_CS_FOR_Qualification_Type";
pub const CS_MEDICATION_CATEGORY: &str =
    "https://fhir.kbv.de/CodeSystem/KBV_CS_ERP_Medication_Category";
pub const CS_PZN: &str = "http://fhir.de/CodeSystem/ifa/pzn";
pub const CS_DARREICHUNGSFORM: &str =
    "https://fhir.kbv.de/CodeSystem/KBV_CS_SFHIR_KBV_DARREICHUNGSFORM";
pub const CS_STATUS_CO_PAYMENT: &str = "https://fhir.kbv.de/CodeSystem/KBV_CS_ERP_StatusCoPayment";
pub const CS_UCUM: &str = "http://unitsofmeasure.org";

// Extensions
pub const EX_OWN_NAME: &str = "http://hl7.org/fhir/StructureDefinition/humanname-own-name";
pub const EX_OWN_PREFIX: &str = "http://hl7.org/fhir/StructureDefinition/humanname-own-prefix";
pub const EX_NAMENSZUSATZ: &str = "http://fhir.de/StructureDefinition/humanname-namenszusatz";
pub const EX_EN_QUALIFIER: &str = "http://hl7.org/fhir/StructureDefinition/iso21090-EN-qualifier";
pub const EX_GENDER_AMTLICH: &str = "http://fhir.de/StructureDefinition/gender-amtlich-de";
pub const EX_STREET_NAME: &str = "http://hl7.org/fhir/StructureDefinition/iso21090-ADXP-streetName";
pub const EX_HOUSE_NUMBER: &str =
    "http://hl7.org/fhir/StructureDefinition/iso21090-ADXP-houseNumber";
pub const EX_ADDITIONAL_LOCATOR: &str =
    "http://hl7.org/fhir/StructureDefinition/iso21090-ADXP-additionalLocator";
pub const EX_POST_BOX: &str = "http://hl7.org/fhir/StructureDefinition/iso21090-ADXP-postBox";
pub const EX_BESONDERE_PERSONENGRUPPE: &str =
    "http://fhir.de/StructureDefinition/gkv/besondere-personengruppe";
pub const EX_DMP_KENNZEICHEN: &str = "http://fhir.de/StructureDefinition/gkv/dmp-kennzeichen";
pub const EX_VERSICHERTENART: &str = "http://fhir.de/StructureDefinition/gkv/versichertenart";
pub const EX_WOP: &str = "http://fhir.de/StructureDefinition/gkv/wop";
pub const EX_MEDICATION_CATEGORY: &str =
    "https://fhir.kbv.de/StructureDefinition/KBV_EX_ERP_Medication_Category";
pub const EX_MEDICATION_VACCINE: &str =
    "https://fhir.kbv.de/StructureDefinition/KBV_EX_ERP_Medication_Vaccine";
pub const EX_NORMGROESSE: &str = "http://fhir.de/StructureDefinition/normgroesse";
pub const EX_STATUS_CO_PAYMENT: &str =
    "https://fhir.kbv.de/StructureDefinition/KBV_EX_ERP_StatusCoPayment";
pub const EX_EMERGENCY_SERVICES_FEE: &str =
    "https://fhir.kbv.de/StructureDefinition/KBV_EX_ERP_EmergencyServicesFee";
pub const EX_BVG: &str = "https://fhir.kbv.de/StructureDefinition/KBV_EX_ERP_BVG";
pub const EX_MULTIPLE_PRESCRIPTION: &str =
    "https://fhir.kbv.de/StructureDefinition/KBV_EX_ERP_Multiple_Prescription";
pub const EX_DOSAGE_FLAG: &str = "https://fhir.kbv.de/StructureDefinition/KBV_EX_ERP_DosageFlag";
