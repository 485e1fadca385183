//! Fixed analysis content: the design-mode simulation, the fallback used when
//! the remote path fails, and the instruction prompt sent to the provider.

use vscore_models::{
    ActionType, AnalysisFragment, Category, EditingStep, FinalStatus, Priority, Recommendation,
};

/// Sampling temperature for video analysis.
pub const ANALYSIS_TEMPERATURE: f32 = 0.4;

/// Score reported by the fallback result.
pub const FALLBACK_SCORE: u8 = 78;

/// Base score the simulation subtracts priority penalties from.
const SIMULATION_BASE_SCORE: i32 = 90;
const SIMULATION_MIN_SCORE: i32 = 50;
const SIMULATION_MAX_SCORE: i32 = 98;

/// Instruction prompt for the remote analysis.
pub const ANALYSIS_PROMPT: &str = concat!(
    "Analiza este video como un experto en contenido viral y edición. ",
    "Devuelve EXACTAMENTE un objeto JSON con los siguientes campos: ",
    "{\"recommendations\": [4 items con tipos hook|lighting|audio|cta y campos ",
    "id,title,description,priority(high|medium|low),timestamp(segundos)], ",
    "\"retention_score\": número entero de 0 a 100 basado en tu evaluación técnica ",
    "(gancho, ritmo, claridad de audio, iluminación, CTA), ",
    "\"final_status\": \"ready\" si retention_score >= 85, de lo contrario \"changes_needed\", ",
    "\"editing_timeline\": [lista de 4-6 pasos técnicos con campos timestamp(formato MM:SS), ",
    "timestamp_seconds(número), action_type(zoom|cut|color|audio|text|transition), ",
    "technical_action(instrucción precisa para el editor), reason(por qué mejora la retención)] }. ",
    "Los pasos deben poder aplicarse en CapCut o Premiere. ",
    "No escribas NADA más que ese objeto JSON. Idioma: Español."
);

pub fn simulated_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation::new(
            "rec-1",
            Category::Hook,
            "Gancho Visual",
            "Falta impacto inicial.",
            Priority::High,
            1,
        ),
        Recommendation::new(
            "rec-2",
            Category::Lighting,
            "Iluminación",
            "Sube la exposición.",
            Priority::Medium,
            5,
        ),
        Recommendation::new(
            "rec-3",
            Category::Audio,
            "Audio",
            "Limpia el ruido.",
            Priority::Low,
            10,
        ),
        Recommendation::new(
            "rec-4",
            Category::Cta,
            "CTA",
            "Hazlo más directo.",
            Priority::High,
            25,
        ),
    ]
}

pub fn simulated_timeline() -> Vec<EditingStep> {
    vec![
        EditingStep::at(
            1,
            ActionType::Zoom,
            "Realizar Zoom-in de 110% al rostro",
            "El gancho necesita más cercanía emocional en los primeros 3 segundos",
        ),
        EditingStep::at(
            5,
            ActionType::Color,
            "Aumentar Exposición +15% y contraste +10%",
            "La iluminación está apagada, esto retiene menos atención",
        ),
        EditingStep::at(
            10,
            ActionType::Audio,
            "Aplicar filtro Noise Reduction -12dB",
            "El ruido de fondo distrae del mensaje principal",
        ),
        EditingStep::at(
            25,
            ActionType::Text,
            "Añadir subtítulo resaltado con el CTA",
            "El llamado a la acción no es visible, necesita refuerzo visual",
        ),
    ]
}

/// 90 minus the summed priority penalties, clamped to `[50, 98]`.
pub fn simulated_score(recommendations: &[Recommendation]) -> u8 {
    let penalty: i32 = recommendations
        .iter()
        .map(|r| i32::from(r.priority.severity()))
        .sum();
    (SIMULATION_BASE_SCORE - penalty).clamp(SIMULATION_MIN_SCORE, SIMULATION_MAX_SCORE) as u8
}

/// The complete design-mode analysis.
pub fn simulated_fragment() -> AnalysisFragment {
    let recommendations = simulated_recommendations();
    let score = simulated_score(&recommendations);

    AnalysisFragment {
        recommendations: encode(&recommendations),
        retention_score: Some(score.into()),
        final_status: Some(FinalStatus::from_score(score).as_str().to_string()),
        editing_timeline: simulated_timeline(),
    }
}

pub fn fallback_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation::new(
            "err-1",
            Category::Hook,
            "Revisar Gancho",
            "Asegura impacto en los primeros 3 segundos.",
            Priority::High,
            0,
        ),
        Recommendation::new(
            "err-2",
            Category::Lighting,
            "Revisar Luz",
            "Busca una fuente de luz frontal clara.",
            Priority::Medium,
            0,
        ),
        Recommendation::new(
            "err-3",
            Category::Audio,
            "Revisar Audio",
            "Comprueba que la voz se escuche sobre la música.",
            Priority::Medium,
            0,
        ),
        Recommendation::new(
            "err-4",
            Category::Cta,
            "Revisar CTA",
            "No olvides pedir una acción clara al final.",
            Priority::Low,
            0,
        ),
    ]
}

/// Fallback recommendations as canonical JSON array text.
pub fn fallback_recommendations_json() -> String {
    encode(&fallback_recommendations())
}

pub fn fallback_timeline() -> Vec<EditingStep> {
    vec![
        EditingStep::at(
            0,
            ActionType::Zoom,
            "Revisar apertura con zoom o corte dinámico",
            "Necesitas captar atención desde el primer frame",
        ),
        EditingStep::at(
            3,
            ActionType::Text,
            "Añadir subtítulo o texto animado",
            "Refuerza el mensaje visual con texto",
        ),
    ]
}

/// The result reported when the remote path fails for any reason.
pub fn fallback_fragment() -> AnalysisFragment {
    AnalysisFragment {
        recommendations: fallback_recommendations_json(),
        retention_score: Some(FALLBACK_SCORE.into()),
        final_status: Some(FinalStatus::ChangesNeeded.as_str().to_string()),
        editing_timeline: fallback_timeline(),
    }
}

fn encode(recommendations: &[Recommendation]) -> String {
    // Serializing plain structs of strings and enums cannot fail.
    serde_json::to_string(recommendations).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_simulated_score_for_fixed_set() {
        assert_eq!(simulated_score(&simulated_recommendations()), 76);
    }

    #[test]
    fn test_simulated_score_is_clamped() {
        let many_high: Vec<_> = (0..20)
            .map(|i| {
                Recommendation::new(i.to_string(), Category::Hook, "t", "d", Priority::High, 0)
            })
            .collect();
        assert_eq!(simulated_score(&many_high), 50);
        assert_eq!(simulated_score(&[]), 90);
    }

    #[test]
    fn test_simulated_fragment_shape() {
        let fragment = simulated_fragment();
        let recs: Vec<Value> = serde_json::from_str(&fragment.recommendations).unwrap();

        assert_eq!(recs.len(), 4);
        let types: Vec<&str> = recs.iter().filter_map(|r| r["type"].as_str()).collect();
        assert_eq!(types, vec!["hook", "lighting", "audio", "cta"]);
        let ids: Vec<&str> = recs.iter().filter_map(|r| r["id"].as_str()).collect();
        assert_eq!(ids, vec!["rec-1", "rec-2", "rec-3", "rec-4"]);
        assert_eq!(recs[3]["timestamp"], 25);
        assert_eq!(fragment.final_status.as_deref(), Some("changes_needed"));
        assert_eq!(fragment.editing_timeline.len(), 4);
        assert_eq!(fragment.editing_timeline[1].display_timestamp, "00:05");
        assert_eq!(fragment.editing_timeline[3].display_timestamp, "00:25");
    }

    #[test]
    fn test_fallback_fragment() {
        let fragment = fallback_fragment();
        let recs: Vec<Value> = serde_json::from_str(&fragment.recommendations).unwrap();

        assert_eq!(recs.len(), 4);
        assert!(recs.iter().all(|r| r["timestamp"] == 0));
        assert_eq!(recs[0]["id"], "err-1");
        assert_eq!(recs[3]["priority"], "low");
        assert_eq!(fragment.retention_score, Some(Value::from(78)));
        assert_eq!(fragment.editing_timeline.len(), 2);
        assert_eq!(fragment.editing_timeline[1].display_timestamp, "00:03");
    }

    #[test]
    fn test_prompt_names_every_category() {
        for category in Category::ALL {
            assert!(ANALYSIS_PROMPT.contains(category.as_str()));
        }
        assert!(ANALYSIS_PROMPT.contains("editing_timeline"));
    }
}
