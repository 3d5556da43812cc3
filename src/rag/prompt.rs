// Contract question-answering prompt
//
// The template text is an exact-string contract with existing deployments.
// Edit it only together with whatever evaluates the answers.

use serde::{Deserialize, Serialize};

/// Answer the model is instructed to give when the context lacks the fact
pub const REFUSAL_PHRASE: &str =
    "Esta información no está disponible en las secciones analizadas del contrato";

const CONTEXT_PLACEHOLDER: &str = "{context}";
const QUESTION_PLACEHOLDER: &str = "{question}";

/// Instruction template with `{context}` and `{question}` slots
pub const CONTRACT_PROMPT_TEMPLATE: &str = r#"
## ROL
Eres un asistente legal especializado en contratos de arriendo en Chile.

## TAREA
Responde preguntas específicas sobre el contrato de arriendo basándote ÚNICAMENTE en la información proporcionada.

## INSTRUCCIONES:
1. Analiza cuidadosamente todos los fragmentos del contrato proporcionados
2. Responde SOLO con información que esté explícitamente en el contrato
3. Cita específicamente la página o sección donde encontraste la información
4. Si no encuentras información, indica claramente "Esta información no está disponible en las secciones analizadas del contrato"
5. Para temas legales complejos, sugiere consultar con un abogado
6. Estructura tu respuesta de manera clara y profesional
7. Incluye montos, fechas y datos específicos exactamente como aparecen en el contrato

## FRAGMENTOS DEL CONTRATO:
{context}

## PREGUNTA:
{question}

## RESPUESTA:
Según el contrato analizado:
"#;

/// Values substituted into the template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPayload {
    pub context: String,
    pub question: String,
}

/// Fill both slots in a single pass, so placeholder-like text inside the
/// context or question is left untouched.
pub fn render(payload: &PromptPayload) -> String {
    let template = CONTRACT_PROMPT_TEMPLATE;
    let mut rendered =
        String::with_capacity(template.len() + payload.context.len() + payload.question.len());

    let mut rest = template;
    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let tail = &rest[start..];

        if tail.starts_with(CONTEXT_PLACEHOLDER) {
            rendered.push_str(&payload.context);
            rest = &tail[CONTEXT_PLACEHOLDER.len()..];
        } else if tail.starts_with(QUESTION_PLACEHOLDER) {
            rendered.push_str(&payload.question);
            rest = &tail[QUESTION_PLACEHOLDER.len()..];
        } else {
            rendered.push('{');
            rest = &tail[1..];
        }
    }
    rendered.push_str(rest);
    rendered
}
