/// Role and output contract for the triage model.
pub const TRIAGE_SYSTEM_PROMPT: &str = "You are a medical AI assistant specialized in rural \
healthcare in India. Provide symptom assessment focused on common rural health issues. Always \
recommend consulting with a doctor for serious symptoms. Be culturally sensitive and use simple \
language. Respond in JSON format with: assessment (string), severity (one of \
low/medium/high/emergency), recommendations (list of strings), and referral_needed (boolean).";

pub fn build_triage_prompt(symptoms: &[String], additional_info: Option<&str>) -> String {
    format!(
        "Patient symptoms: {}. Additional information: {}. \
         Please provide a medical assessment suitable for rural healthcare context.",
        symptoms.join(", "),
        additional_info.unwrap_or_default().trim(),
    )
}
