use sapper_core::counter_glyphs;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct CounterProps {
    pub value: i32,
}

/// Three digit display, one element per glyph.
#[function_component]
pub(crate) fn Counter(props: &CounterProps) -> Html {
    html! {
        <div class="counter">
            {
                for counter_glyphs(props.value).into_iter().enumerate().map(|(index, glyph)| html! {
                    <div key={index} class={glyph.class()}/>
                })
            }
        </div>
    }
}
