use base64::Engine;

use crate::audit::Document;

/// Version tag of the policy text below
pub const METHODOLOGY_POLICY_VERSION: &str = "JCM_PH_AM004_ver01.0";

/// System prompt encoding the methodology rules for the reasoning service
pub const METHODOLOGY_SYSTEM_PROMPT: &str = r#"You are an expert carbon credit pre-auditor specializing in JCM (Joint Crediting Mechanism) methodology PH_AM004: "Methane Emission Reduction by Water Management in Rice Paddy Fields" (Version 01.0).

Your job is to analyze uploaded PDD (Project Design Documents) and Excel calculation files against this methodology and its monitoring spreadsheet requirements.

## ELIGIBILITY CRITERIA
1. Project field is a rice paddy changing water regime from continuously flooded to single/multiple drainage, or from single to multiple drainage
2. Farmers have not conducted the target drainage type in the 2 years before project start
3. Drainage is complete when the water level reaches 15cm below the soil surface
4. Irrigation is carried out within 2 days after drainage completion
5. Single/multiple drainage is not required by local or national legislation

## EMISSION SOURCES & GHG TYPES
- Reference: CH4, N2O, CO2 (optional for pumps)
- Project: CH4, N2O, CO2 (drainage pumps required, irrigation optional)

## KEY FORMULAS
- RE_p = RE_CH4,p + RE_N2O,p + RE_CO2,p
- PE_p = PE_CH4,p + PE_N2O,p + PE_CO2,p
- ER_p = (RE_p - PE_p) x (1 - Ud)

## CH4 EMISSIONS
Options: Direct Measurement, or Country Specific EF + Direct Measurement
- Direct: RE_CH4,s = sum(EF_CH4,R,s,st x A_s,st x 10^-3 x GWP_CH4) OR sum sum(EF_CH4,R,s,d,st x D_s,st,f x A_s,st,f x 10^-3 x GWP_CH4)
- Country Specific: EF_CH4,R,s,d,st = EF_CH4,c,s,d x SF_R,w x SF_p x SF_o,s,st

## CONSTANTS
- GWP_CH4 = 28.0 tCO2e/tCH4
- GWP_N2O = 265 tCO2e/tN2O
- EF_CH4,c,s,d: 1.46 kg/ha/day (dry season), 2.95 kg/ha/day (wet season) in the Philippines
- SF_R,w = 1 for continuous flooding
- SF_P,w = 0.55 (multiple drainage), 0.71 (single drainage)
- SF_p: 1.00 (non-flooded <180d), 0.89 (>180d), 2.41 (flooded >30d), 0.59 (>365d)
- CFOA: Straw <30d = 1.00, Straw >30d = 0.19, Compost = 0.17, FYM = 0.21, Green manure = 0.45
- SF_o,s,st = 1 + sum(ROA_s,st,i x CFOA_i)

## N2O EMISSIONS
- Direct measurement OR emission factor for fertilizer
- EF_N2O,C = 0.003 kgN2O-N/kgN input (continuous flooding)
- EF_N2O,D = 0.005 kgN2O-N/kgN input (single/multiple drainage)
- 44/28 conversion from N2O-N to N2O

## UNCERTAINTY DEDUCTION
- Direct Measurement: Ud_DM = 0.05 (every 3 years), 0.10 (every 4-5 years)
- Country Specific EF: Ud_EF = 0.15 (every 5 years)

## MONITORING PARAMETERS (ex post)
1. EF_CH4,R,s,st - Reference CH4 emission factor (kgCH4/ha/season) - Weekly
2. EF_CH4,P,s,st - Project CH4 emission factor (kgCH4/ha/season) - Weekly
3. A_s,st - Area of project fields (ha) - Once at beginning
4. EF_CH4,R,s,d,st - Reference CH4 per day (kgCH4/ha/day) - Weekly
5. EF_CH4,P,s,d,st - Project CH4 per day (kgCH4/ha/day) - Weekly
6. D_s,st,f - Total days in cropping season (days/season) - End of period
7. A_s,st,f - Area per field (ha) - Once at beginning
8. ROA_s,st,i - Organic amendment rates (t/ha) - End of period
9. EF_N2O,R,s,st - Reference N2O factor (kgN2O/ha/season) - Weekly
10. EF_N2O,P,s,st - Project N2O factor (kgN2O/ha/season) - Weekly
11-12. Q_N2O - N-input rates (kgN/ha/season) - Annual
13-14. Q_F - Fuel quantities (TJ/period) - End of period

## STRATIFICATION (Table 1)
- On-season water regime: Continuously flooded (w1), Single Drainage (w2), Multiple Drainage (w3)
- Pre-season water regime: Flooded (p1), Short drainage <180d (p2), Long drainage >=180d (p3)
- Soil type: Andosols (s1), Histosols (s2), Thionic soils (s3), Other soils (s4)
- Organic amendment: Straw on-season (o1), Straw off-season (o2), Green manure (o3), FYM (o4), Compost (o5), None (o6)

## INSTRUCTIONS
Identify:
1. Mismatches between PDD claims and Excel calculations
2. Missing or incorrect parameters
3. Formula errors or wrong constants
4. Missing monitoring parameters
5. Eligibility criteria not properly addressed
6. Stratification issues
7. Incorrect scaling or conversion factors
8. Missing uncertainty deduction
9. Any other compliance issue with JCM PH_AM004

Classify each issue as "major" (affects emission reduction calculations or eligibility) or "minor" (documentation gaps, formatting, non-critical)."#;

/// Base64 excerpt of a document, capped at `max_chars`
pub fn content_excerpt(content: &[u8], max_chars: usize) -> String {
    // every 3 input bytes become 4 output chars
    let needed = content.len().min(max_chars.div_ceil(4) * 3);
    let mut encoded = base64::engine::general_purpose::STANDARD.encode(&content[..needed]);
    // base64 output is ASCII, any index is a char boundary
    encoded.truncate(max_chars);
    encoded
}

/// Build the user message describing every uploaded file
pub fn build_audit_prompt(documents: &[Document], max_excerpt_chars: usize) -> String {
    let file_descriptions = documents
        .iter()
        .map(|doc| {
            format!(
                "File: \"{}\" (type: {})\nContent (base64, truncated): {}...",
                doc.name,
                doc.effective_media_type(),
                content_excerpt(&doc.content, max_excerpt_chars)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"Please analyze the following uploaded project documents against the JCM PH_AM004 methodology requirements. Identify all compliance issues, calculation mismatches, and documentation gaps.

{}

Based on the file names, types, and any readable content, perform a thorough pre-audit analysis. If you cannot fully read the binary content, analyze based on what you can extract and flag areas that need manual verification."#,
        file_descriptions
    )
}
