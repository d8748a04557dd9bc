//! Prompt builders, one per stage.
//!
//! Each builder asks for exactly the tag vocabulary its parser in
//! `bulle_parse` recognizes.

use crate::PromptTemplate;
use bulle_core::{
    ChapterDetailRequest, PromptDialect, PromptsRequest, StoryRequest, StoryboardPanel,
    StoryboardRequest,
};

const FRENCH_ONLY: &str = "**Langue : ÉCRIS TOUTE LA RÉPONSE EN FRANÇAIS.**";
const NO_REFERENCE_DETAILS: &str =
    "No specific character or setting details were provided by the user.";
const NOT_AVAILABLE: &str = "N/A";

fn or_na(value: Option<&str>) -> &str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}

fn number_or_na(value: Option<u32>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |n| n.to_string())
}

/// Prompt of the outline stage: a global title and about ten chapters.
///
/// # Examples
///
/// ```
/// use bulle_core::StoryRequest;
/// use bulle_pipeline::build_outline_prompt;
///
/// let story = StoryRequest::new("phare, tempête", "aventure", "ligne claire", "épique");
/// let prompt = build_outline_prompt(&story);
/// assert!(prompt.contains("- Idée/Mots-clés : phare, tempête\n"));
/// assert!(prompt.contains("RÉSUMÉ CHAPITRE 1 :"));
/// ```
pub fn build_outline_prompt(story: &StoryRequest) -> String {
    PromptTemplate::new(
        "Tâche : Créer une **ossature détaillée** pour une bande dessinée d'environ 48 pages. \
         NE PAS écrire le scénario complet, seulement l'organisation.",
    )
    .context(
        "INPUTS UTILISATEUR :",
        [
            ("Idée/Mots-clés", Some(story.keywords.as_str())),
            ("Genre", Some(story.genre.as_str())),
            ("Style Visuel Cible (pour info)", Some(story.style.as_str())),
            ("Ton", Some(story.tone.as_str())),
            ("Détails Additionnels", story.details()),
        ],
    )
    .instructions(
        "INSTRUCTIONS SPÉCIFIQUES POUR L'OSSATURE :",
        [
            FRENCH_ONLY,
            "Crée un **TITRE GLOBAL** accrocheur.",
            "Divise l'histoire en environ **10 CHAPITRES** logiques.",
            "Pour **CHAQUE chapitre**, fournis un **TITRE DE CHAPITRE** et un \
             **RÉSUMÉ DE CHAPITRE** très court (**1 à 2 phrases MAXIMUM**).",
            "**NE PAS écrire les dialogues, descriptions de cases...**",
        ],
    )
    .text(
        "FORMAT DE SORTIE ATTENDU (IMPORTANT - Suivre EXACTEMENT) :",
        "TITRE GLOBAL : [Titre global ici]\n\n\
         CHAPITRE 1 : [Titre Chapitre 1]\n\
         RÉSUMÉ CHAPITRE 1 : [Résumé 1-2 phrases]\n\n\
         CHAPITRE 2 : [Titre Chapitre 2]\n\
         RÉSUMÉ CHAPITRE 2 : [Résumé 1-2 phrases]\n\n\
         [...]\n\n\
         CHAPITRE 10 : [Titre Chapitre 10]\n\
         RÉSUMÉ CHAPITRE 10 : [Résumé 1-2 phrases]",
    )
    .finish(
        "**RAPPEL FINAL : Génère UNIQUEMENT l'ossature (titre global, titres chapitres, \
         résumés courts) en FRANÇAIS.**",
        "OSSATURE CI-DESSOUS :",
    )
    .render()
}

/// Prompt of the chapter detail stage: one chapter, page by page.
pub fn build_chapter_detail_prompt(req: &ChapterDetailRequest) -> String {
    let number = number_or_na(req.chapter_number);
    let total = number_or_na(req.total_chapters);
    let story = &req.story;

    PromptTemplate::new(
        "Tâche : Écrire le scénario **détaillé** pour **UN SEUL CHAPITRE** d'une bande \
         dessinée, en suivant le format Page/Case.",
    )
    .context(
        "CONTEXTE GÉNÉRAL DE LA BD :",
        [
            ("Titre Global", Some(req.global_title.as_str())),
            ("Idée/Mots-clés", Some(story.keywords.as_str())),
            ("Genre", Some(story.genre.as_str())),
            ("Style Visuel Cible (pour info)", Some(story.style.as_str())),
            ("Ton", Some(story.tone.as_str())),
            ("Détails Additionnels", story.details()),
            ("Nombre Total de Chapitres prévus", Some(total.as_str())),
        ],
    )
    .context(
        "CONTEXTE SPÉCIFIQUE DU CHAPITRE À DÉTAILLER :",
        [
            ("Numéro du Chapitre", Some(number.as_str())),
            ("Titre du Chapitre", Some(req.chapter_title.as_str())),
            (
                "Résumé Court du Chapitre (guide)",
                req.chapter_summary.as_deref(),
            ),
        ],
    )
    .instructions(
        "INSTRUCTIONS POUR LE SCÉNARIO DÉTAILLÉ (Suivre attentivement) :",
        [
            FRENCH_ONLY.to_string(),
            format!(
                "**Concentration : Ne détaille QUE et UNIQUEMENT le Chapitre {number} (\"{}\").**",
                req.chapter_title.trim()
            ),
            "**Découpage Pages :** Découpe le contenu en **Pages** (vise **1 ou 2 pages MAXIMUM**)."
                .to_string(),
            "**Découpage Cases :** Pour **CHAQUE page**, découpe-la en **Cases** \
             (vise **2 à 4 MAXIMUM** par page)."
                .to_string(),
            "**Contenu Case :** Pour **CHAQUE case**, fournis au minimum une **Description** \
             visuelle. Ajoute **Dialogue** et **Pensées** si crucial."
                .to_string(),
            "**Clarté Format :** Utilise une structure claire.".to_string(),
        ],
    )
    .text(
        "FORMAT DE SORTIE ATTENDU POUR CE CHAPITRE (Suivre précisément) :",
        "PAGE 1\n\
         Case 1: [Description case 1].\n    PERSONNAGE: \"Dialogue.\"\n    (Pensée.)\n\
         Case 2: [Description case 2].\n[...]\n\n\
         PAGE 2\nCase 1: [Description case 1 page 2].\n[...]",
    )
    .finish(
        format!(
            "**RAPPEL FINAL : Détaille UNIQUEMENT le Chapitre {number} en FRANÇAIS, \
             format Page/Case, longueur limitée.**"
        ),
        format!("SCÉNARIO DÉTAILLÉ DU CHAPITRE {number} CI-DESSOUS :"),
    )
    .render()
}

/// Prompt of the storyboard stage, embedding the chapter script.
pub fn build_storyboard_prompt(req: &StoryboardRequest) -> String {
    let number = number_or_na(req.chapter_number);
    let title = req.chapter_title.as_deref().unwrap_or_default().trim();

    PromptTemplate::new(
        "Tâche : Pour **CHAQUE Case** décrite dans le scénario détaillé du chapitre ci-dessous, \
         génère une description visuelle enrichie pour un storyboard.",
    )
    .context(
        "CONTEXTE GÉNÉRAL DE LA BD :",
        [
            ("Titre Global", Some(or_na(req.global_title.as_deref()))),
            ("Genre", req.genre.as_deref()),
            ("Style Visuel Cible", Some(req.style.as_str())),
            ("Ton", req.tone.as_deref()),
            ("Détails Additionnels", req.details.as_deref()),
        ],
    )
    .fenced(
        format!("SCÉNARIO DÉTAILLÉ DU CHAPITRE {number} (\"{title}\") À ANALYSER :"),
        req.detailed_scenario_text.trim(),
    )
    .instructions(
        "INSTRUCTIONS POUR LE STORYBOARD (POUR CHAQUE CASE DU SCÉNARIO FOURNI) :",
        [
            FRENCH_ONLY,
            "**Analyse :** Lis attentivement description, dialogue, pensées.",
            "**Description Enrichie :** Écris une **DESCRIPTION VISUELLE ENRICHIE** \
             (personnages, actions, décor, ambiance).",
            "**Suggestion Technique :** Suggère un **TYPE DE PLAN** \
             (ex: Gros Plan, Plan Moyen, Plan d'Ensemble...).",
            "**Suggestion d'Angle :** Suggère un **ANGLE DE CAMÉRA** \
             (ex: Normal, Plongée, Contre-plongée...).",
            "**Notes Optionnelles :** Ajoute de courtes **NOTES** si pertinent \
             (éclairage, effet...).",
            "**Structure :** Conserve numéros PAGE et CASE.",
        ],
    )
    .text(
        "FORMAT DE SORTIE ATTENDU (Suivre pour CHAQUE case) :",
        "PAGE [Numéro]\n\
         CASE [Numéro]\n\
         DESCRIPTION VISUELLE ENRICHIE: [Description]\n\
         TYPE DE PLAN: [Suggestion]\n\
         ANGLE: [Suggestion]\n\
         NOTES: [Notes ou \"Aucune\"]\n\n\
         (Répéter)",
    )
    .finish(
        "**RAPPEL FINAL : Analyse le scénario fourni et génère les détails storyboard pour \
         CHAQUE case en FRANÇAIS.**",
        "STORYBOARD DÉTAILLÉ CI-DESSOUS :",
    )
    .render()
}

/// Storyboard panels as listed to the image prompt stage.
///
/// A `PAGE n` heading opens each new page and panels follow in the given order.
///
/// # Examples
///
/// ```
/// use bulle_core::StoryboardPanel;
/// use bulle_pipeline::render_storyboard_context;
///
/// let panel = StoryboardPanel {
///     page: 1,
///     panel: 2,
///     description: "Un quai.".to_string(),
///     shot_type: None,
///     angle: Some("Plongée".to_string()),
///     notes: None,
/// };
/// assert_eq!(
///     render_storyboard_context(&[panel]),
///     "PAGE 1\n------\nCASE 2:\n- Description: Un quai.\n- Shot Type: N/A\n- Angle: Plongée\n- Notes: None\n\n"
/// );
/// ```
pub fn render_storyboard_context(panels: &[StoryboardPanel]) -> String {
    let mut out = String::new();
    let mut current_page = None;

    for panel in panels {
        if current_page != Some(panel.page) {
            if current_page.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("PAGE {}\n------\n", panel.page));
            current_page = Some(panel.page);
        }
        out.push_str(&format!(
            "CASE {}:\n- Description: {}\n- Shot Type: {}\n- Angle: {}\n- Notes: {}\n\n",
            panel.panel,
            or_na(Some(panel.description.as_str())),
            or_na(panel.shot_type.as_deref()),
            or_na(panel.angle.as_deref()),
            panel
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or("None"),
        ));
    }
    out
}

/// Line format the image prompt stage asks for in `dialect`.
pub fn output_format(dialect: PromptDialect) -> &'static str {
    match dialect {
        PromptDialect::SingleIndex => "PANEL [Panel Number] PROMPT: [Generated English prompt \
             adhering to ALL consistency and content instructions above.]",
        PromptDialect::PagePanel => "PAGE [Page Number] - CASE [Panel Number] PROMPT: \
             [Generated English prompt adhering to ALL consistency and content instructions above.]",
    }
}

/// Prompt of the image prompt stage, in English.
///
/// # Examples
///
/// ```
/// use bulle_core::{PromptDialect, PromptsRequest, StoryboardPanel};
/// use bulle_pipeline::build_prompts_prompt;
///
/// let req = PromptsRequest {
///     style: "ink wash".to_string(),
///     storyboard: vec![StoryboardPanel {
///         page: 1,
///         panel: 1,
///         description: "A lighthouse.".to_string(),
///         shot_type: None,
///         angle: None,
///         notes: None,
///     }],
///     ..Default::default()
/// };
/// let prompt = build_prompts_prompt(&req, PromptDialect::PagePanel);
/// assert!(prompt.contains("- Visual Style: ink wash\n"));
/// assert!(prompt.contains("PAGE [Page Number] - CASE [Panel Number] PROMPT:"));
/// assert!(prompt.ends_with("PROMPTS BELOW:\n------------------------------------\n"));
/// ```
pub fn build_prompts_prompt(req: &PromptsRequest, dialect: PromptDialect) -> String {
    let chapter_label = format!("Chapter {}", number_or_na(req.chapter_number));
    let style = req.style.trim();

    PromptTemplate::new(
        "TASK: Generate image generation prompts in **ENGLISH**, optimized for Midjourney, for \
         EACH panel described below. Adhere strictly to character and setting consistency \
         throughout this response.",
    )
    .label_separator(": ")
    .context(
        "CONTEXT:",
        [
            ("Visual Style", Some(style)),
            ("Genre", Some(or_na(req.genre.as_deref()))),
            ("Tone", Some(or_na(req.tone.as_deref()))),
            (chapter_label.as_str(), Some(or_na(req.chapter_title.as_deref()))),
        ],
    )
    .fenced(
        "**CHARACTER/SETTING REFERENCE DETAILS (Use these FIRST):**",
        req.details
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(NO_REFERENCE_DETAILS),
    )
    .fenced(
        "STORYBOARD PANELS FOR THIS CHAPTER:",
        render_storyboard_context(&req.storyboard),
    )
    .instructions(
        "**CRITICAL INSTRUCTIONS FOR CONSISTENCY AND PROMPT GENERATION:**",
        [
            "**Parse Storyboard:** For each PAGE and CASE in the storyboard: identify the \
             description, shot type, angle, and any characters present."
                .to_string(),
            "**Consistency Check:** If a character or setting from the REFERENCE DETAILS is \
             present in the panel, you MUST use the EXACT description provided there. A new \
             character or setting keeps the description you establish at its first appearance \
             for ALL subsequent panels of THIS response. Include the names of known characters."
                .to_string(),
            format!(
                "**Prompt Content:** Generate ONE English prompt per panel, primarily using the \
                 panel's \"Description\", incorporating the camera details (Shot Type/Angle \
                 translated to English terms), and reflecting the \"Visual Style: {style}\"."
            ),
            "**Prompt Structure:** [Subject/Characters (with CONSISTENT description)], \
             [Action/Pose], [Setting/Background Details], [Mood/Atmosphere], [Style Keywords], \
             [Camera Shot/Angle]."
                .to_string(),
            "**Exclusions:** **DO NOT include technical parameters** like `--v` or `--ar`."
                .to_string(),
        ],
    )
    .text(
        "**OUTPUT FORMAT (Strictly follow for EACH panel):**",
        format!(
            "{}\n\n(Repeat for all panels, ensuring consistency is maintained throughout the \
             entire list of prompts)",
            output_format(dialect)
        ),
    )
    .finish(
        "**FINAL CHECK: Before outputting, verify that for every prompt, character/setting \
         descriptions match either the USER-PROVIDED DETAILS or the description you established \
         for them upon their first appearance in this specific response. Ensure names are \
         included.**",
        "PROMPTS BELOW:",
    )
    .render()
}
