use triage_types::ContextSnippet;

/// Build the fixed system prompt for the judgment service.
///
/// The scoring bands and safety rules are part of the scorer's
/// configuration contract, not mutable state; both thresholds are rendered
/// in so the service and the emergency gate agree.
pub fn build_system_prompt(emergency_score: i32, emergency_confidence: f32) -> String {
    format!(
        "You are a clinical triage AI assistant grounded in Uganda Ministry of Health Clinical Guidelines.\n\
\n\
YOUR ROLE:\n\
- Analyze patient symptoms systematically\n\
- Assign triage scores (1-10 scale)\n\
- Provide confidence scores (0.0-1.0)\n\
- Recommend appropriate care level and specialty\n\
- Cite guideline page numbers when available\n\
\n\
TRIAGE SCORING:\n\
1-3: Stable - Routine care, can wait\n\
4-6: Moderate - Needs attention within hours\n\
7-8: High Risk - Needs urgent attention within 1 hour\n\
9-10: Critical/Emergency - Life-threatening, immediate referral\n\
\n\
EMERGENCY CRITERIA:\n\
Mark as emergency ONLY if triage_score >= {emergency_score} \
and confidence_score >= {emergency_confidence}\n\
\n\
SAFETY RULES:\n\
1. Be conservative - if uncertain, score higher\n\
2. Always cite guideline source if using retrieved context\n\
3. Flag low confidence scores for human review\n\
4. Never hallucinate medication names\n\
5. Focus on immediate triage decision, not full diagnosis"
    )
}

/// Build the per-case user prompt.
///
/// Context snippets are rendered in the order the retriever returned them:
/// that ordering encodes relevance rank and is preserved here.
pub fn build_user_prompt(
    symptoms: &[String],
    age: &str,
    gender: &str,
    context: &[ContextSnippet],
) -> String {
    let mut prompt = format!(
        "PATIENT INFORMATION:\nAge: {}\nGender: {}\nSymptoms: {}\n",
        age,
        gender,
        symptoms.join(", ")
    );

    if !context.is_empty() {
        prompt.push_str("\nRELEVANT CLINICAL GUIDELINES:\n");
        for (idx, snippet) in context.iter().enumerate() {
            prompt.push_str(&format!(
                "\n[Context {}] (Page {})\n{}\n",
                idx + 1,
                snippet.page_ref,
                snippet.content
            ));
        }
    }

    prompt.push_str(
        "\nPERFORM TRIAGE ANALYSIS:\n\
Analyze the patient systematically and return JSON with:\n\
- triage_score (1-10)\n\
- confidence_score (0.0-1.0)\n\
- condition_detected\n\
- is_emergency (true/false)\n\
- recommended_specialty\n\
- first_aid_steps\n\
- reasoning_summary\n\
- guideline_page (if using guideline context)",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(content: &str, page: &str) -> ContextSnippet {
        ContextSnippet {
            content: content.to_string(),
            page_ref: page.to_string(),
            condition: String::new(),
            source: "Uganda_MoH_Guidelines".to_string(),
        }
    }

    #[test]
    fn user_prompt_preserves_context_order() {
        let context = vec![snippet("most relevant", "4"), snippet("second", "9")];
        let prompt = build_user_prompt(&["fever".to_string()], "3", "male", &context);

        let first = prompt.find("most relevant").unwrap();
        let second = prompt.find("second").unwrap();
        assert!(first < second);
        assert!(prompt.contains("[Context 1] (Page 4)"));
        assert!(prompt.contains("[Context 2] (Page 9)"));
    }

    #[test]
    fn empty_context_omits_guidelines_section() {
        let prompt = build_user_prompt(&["fever".to_string()], "3", "male", &[]);
        assert!(!prompt.contains("RELEVANT CLINICAL GUIDELINES"));
    }

    #[test]
    fn system_prompt_renders_thresholds() {
        let prompt = build_system_prompt(8, 0.75);
        assert!(prompt.contains("triage_score >= 8"));
        assert!(prompt.contains("confidence_score >= 0.75"));
    }
}
