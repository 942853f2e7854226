//! 提示词模板
//!
//! 三类请求：分析表单结构、回答问题、为未回答的问题生成一条追问。

use crate::models::FieldType;

/// 分析表单 HTML，要求模型输出字段 JSON 数组
pub fn analyze_form_prompt(html_content: &str, current_date: &str) -> String {
    let type_names = FieldType::ALL
        .iter()
        .map(|t| t.label())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"
Task: Convert the provided Google Form HTML code into a JSON representation following specific rules.

HTML Form Characteristics:

-Field IDs are found in the "name" attribute of input elements, prefixed with "entry.".
-The "textarea" element is used for Paragraph question types.
-Checkbox fields have multiple "input" nodes with the same values and an extra input element with a "_sentinel" suffix in its ID. Duplicate nodes should be ignored.

-The form consists of various field types: {type_names}.

Output Format:

-Return a JSON array where each object represents a form field.
-Each object should include field_id, field_type, field_text, and field_options (if applicable).
-field_type must be one of: {type_names}.
-field_text should include both the question title and description. For Grid questions, emit one object per row and include the row question as part of field_text.
-For fields with options (e.g., Multiple Choice, Checkbox, Dropdown, Scale), include an array of options in field_options.

Example JSON Object:

[
  {{
    "field_id": "entry.xxxx",
    "field_type": "Field Type",
    "field_text": "Question Title and Description",
    "field_options": ["Option1", "Option2"]
  }}
]

Instructions:

-Analyze the provided HTML code to identify form fields and their attributes.
-Construct a JSON representation following the specified format.
-Ensure the JSON is valid and can be parsed by a strict JSON parser.

-Current date is {current_date}

HTML Form Code:
{html_content}
"#
    )
}

/// 根据上下文回答所有问题，要求在每个字段上加 `answer`
pub fn answer_prompt(fields_json: &str, context: &str, current_date: &str) -> String {
    format!(
        r#"
Task: Process the provided JSON containing multiple form questions and provide concise answers based on the context given. The JSON is structured as an output from a previous task, detailing various form fields and their characteristics.

Instructions:

Read through the JSON to understand the questions, their types, and options (if any).
Provide answers:
For open-ended questions (e.g., Short Text, Paragraph), provide a brief answer, typically a single word or a short sentence.
For questions with options (e.g., Multiple Choice, Checkbox, Dropdown), select your answer directly from the provided options. If none of the options apply based on the context, respond with "N/A".
For Checkbox and Tick Box Grid questions the answer is a JSON array of the selected options.
For grid questions (Multiple Choice Grid, Tick Box Grid), provide answers according to the row questions, selecting from the provided options for each row.
For Date and Time questions answer in ISO 8601 format.
If the answer cannot be determined from the provided context, respond with "N/A". Do not attempt to infer or create an answer.
Keep every field_id exactly as given.
Update the JSON by adding an "answer" field to each question object with your response.

-Current date is {current_date}

Context:
{context}

Questions JSON:
{fields_json}

Updated Questions JSON with Answers:

Provide the updated JSON here, with an "answer" field added to each question object.
"#
    )
}

/// 为未回答的字段生成一条合并的追问（输出为自然语言，不解析）
pub fn follow_up_prompt(fields_json: &str, context: &str, current_date: &str) -> String {
    format!(
        r#"
Please review the provided survey responses and identify any fields that have been left unanswered, marked as "N/A".
For each of these fields, generate a clear and concise directive that asks the user for the needed information in a format that allows for all responses to be provided in a single line of natural language.
If a field involves choices, please rephrase the directive to allow the user to specify their choices in a natural, conversational manner within the same line.

-Current date is {current_date}

Context:
{context}

Unanswered Fields:
{fields_json}

Instead of creating separate questions for each unanswered field, formulate a single, comprehensive directive that encompasses all the information gaps. This directive should be clear and concise, guiding the user to provide all the missing information in one line of natural language. For example, if there are unanswered fields for "Favorite Color" and "Preferred Contact Method", the directive could be:

"Please tell us your favorite color and how you'd prefer to be contacted, all in one line."

This approach ensures the responses are suitable for a simple environment where users are expected to provide their answers in a single, straightforward input.
"#
    )
}
