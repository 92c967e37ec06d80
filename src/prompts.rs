//! Instruction prompts for the two model calls made per page.
//!
//! Callers can override either prompt via
//! [`crate::config::ProofreadConfig::reformat_prompt`] and
//! [`crate::config::ProofreadConfig::proofread_prompt`]; the constants here
//! are used only when no override is provided.
//!
//! The examples inside [`REFORMAT_PROMPT`] contain a literal `\n` (backslash,
//! `n`) where the fixed output should break a line. The model reads these as
//! line-break markers, so they must not be turned into real newlines.

/// Default instructions for repairing raw PDF text extraction.
pub const REFORMAT_PROMPT: &str = r#"You are a PDF postprocessor, specialising in fixing a number of problems that happen with raw PDF text extraction. Take the input and produce fixed output text only, with no additional narrative or escapes. Examples and their remedies are below.
	Examples of missing spacing and line breaks:
	Input: 1Section 4Near-Term Responses in a Changing Climate
	Output: 1 Section 4 Near-Term Responses in Changing Climate
	Input: 43Current Status and TrendsSection 2Increased concentrations of GHGs in the atmosphereIncreased emissions of greenhouse gases (GHGs)b)a)c)
	Output: 43\nCurrent Status and Trends\nSection 2\nIncreased concentrations of GHGs in the atmosphere\nIncreased emissions of greenhouse gases (GHGs)b)a)c)
	Input: Observed changeassessment Human contributionassessment Main driverMain driver 1979 - mid-1990sSouthern HemisphereMain driverMain driverMain driverLimited evidence & medium agreement Main driverMain driverMain driverMain driverChange in indicatorWarming of global mean surface air temperature since 1850-1900Warming of the troposphere since 1979Cooling of the lower stratosphere since the mid-20th centuryLarge-scale precipitation and upper troposphere humidity changes since 1979Expansion of the zonal mean Hadley Circulation since the 1980sOcean heat content increase since the 1970sSalinity changes since the mid-20th centuryGlobal mean sea level rise since 1970Arctic sea ice loss since 1979Reduction in Northern Hemisphere springtime snow cover since 1950Greenland ice sheet mass loss since 1990sAntarctic ice sheet mass loss since 1990sRetreat of glaciersIncreased amplitude of the seasonal cycle ofatmospheric CO2 since the early 1960sAcidiﬁcation of the global surface oceanMean surface air temperature over land(about 40% larger than global mean warming)Warming of the global climate system since preindustrial timesmediumconﬁdencelikely / highconﬁdencevery likelyextremelylikelyvirtuallycertainfactAtmosphere and water cycleOceanCryosphereCarbon cycleLand climateSynthesisKe
	Output: Observed change assessment\nHuman contribution assessment\nMain driver\nMain driver 1979 - mid-1990s\nSouthern Hemisphere\nMain driver\nMain driver\nMain driver\nLimited evidence & medium agreement\nMain driver\nMain driver\nMain driver\nMain driver\nChange in indicator\nWarming of global mean surface air temperature since 1850-1900\nWarming of the troposphere since 1979\nCooling of the lower stratosphere since the mid-20th century\nLarge-scale precipitation and upper troposphere humidity changes since 1979\nExpansion of the zonal mean Hadley Circulation since the 1980s\nOcean heat content increase since the 1970s\nSalinity changes since the mid-20th century\nGlobal mean sea level rise since 1970\nArctic sea ice loss since 1979\nReduction in Northern Hemisphere springtime snow cover since 1950Greenland ice sheet mass loss since 1990sAntarctic ice sheet mass loss since 1990sRetreat of glaciersIncreased amplitude of the seasonal cycle ofatmospheric CO2 since the early 1960sAcidiﬁcation of the global surface oceanMean surface air temperature over land(about 40% larger than global mean warming)Warming of the global climate system since preindustrial timesmediumconﬁdencelikely / highconﬁdencevery likelyextremelylikelyvirtuallycertainfactAtmosphere and water cycleOceanCryosphereCarbon cycleLand climateSynthesisKe"#;

/// Default instructions for proofreading a tidied page.
pub const PROOFREAD_PROMPT: &str = r#"You are a proofreading assistant for a formal, scientific document.
Review the following excerpt and provide feedback on
spelling, punctuation, grammar, verbosity and tone of voice. Suggest fixes where necessary in markdown format,
quoting the original text and issue in bold"#;

/// Join an instruction prompt and the text it applies to.
///
/// The two are separated by a single space and sent as one user message.
pub fn build_prompt(instruction: &str, text: &str) -> String {
    let mut prompt = String::with_capacity(instruction.len() + 1 + text.len());
    prompt.push_str(instruction);
    prompt.push(' ');
    prompt.push_str(text);
    prompt
}
